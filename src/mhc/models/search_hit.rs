use crate::mhc::models::chain_kind::ChainKind;

/// One line of a sequence search of structure chains against the alpha and beta panels.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    query: String,
    target: String,
    evalue: f64,
    query_coverage: f64,
    target_coverage: f64
}

impl SearchHit {
    pub fn new(query: &str, target: &str, evalue: f64, query_coverage: f64, target_coverage: f64) -> Self {
        return Self {
            query: query.to_owned(),
            target: target.to_owned(),
            evalue: evalue,
            query_coverage: query_coverage,
            target_coverage: target_coverage
        };
    }

    pub fn get_query(&self) -> &str {
        return self.query.as_str();
    }

    pub fn get_evalue(&self) -> f64 {
        return self.evalue;
    }

    pub fn get_query_coverage(&self) -> f64 {
        return self.query_coverage;
    }

    pub fn get_target_coverage(&self) -> f64 {
        return self.target_coverage;
    }

    /// Panel targets are named `alpha.<id>` or `beta.<id>`.
    pub fn kind(&self) -> Option<ChainKind> {
        return self.target.split('.').next().and_then(ChainKind::from_str);
    }
}
