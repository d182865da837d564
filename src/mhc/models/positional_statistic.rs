use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::criterion::Criterion;

/// Statistics of one alignment column.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalStatistic {
    kind: ChainKind,
    aligned_column: usize,
    major_allele: char,
    minor_allele_fraction: f64,
    contact_fractions: Vec<f64>,
    criteria_flags: Vec<bool>
}

impl PositionalStatistic {
    /// `contact_fractions` runs parallel to the cutoffs of the owning table.
    pub fn new(kind: ChainKind, aligned_column: usize, major_allele: char, minor_allele_fraction: f64, contact_fractions: Vec<f64>) -> Self {
        return Self {
            kind: kind,
            aligned_column: aligned_column,
            major_allele: major_allele,
            minor_allele_fraction: minor_allele_fraction,
            contact_fractions: contact_fractions,
            criteria_flags: Vec::new()
        };
    }

    pub fn get_kind(&self) -> ChainKind {
        return self.kind;
    }

    pub fn get_aligned_column(&self) -> usize {
        return self.aligned_column;
    }

    pub fn get_major_allele(&self) -> char {
        return self.major_allele;
    }

    pub fn get_minor_allele_fraction(&self) -> f64 {
        return self.minor_allele_fraction;
    }

    pub fn get_contact_fractions(&self) -> &[f64] {
        return &self.contact_fractions;
    }

    pub fn get_criteria_flags(&self) -> &[bool] {
        return &self.criteria_flags;
    }

    pub fn push_criterion_flag(&mut self, flag: bool) {
        self.criteria_flags.push(flag);
    }
}

/// Positional statistics for all columns of both chain kinds, alpha first, ordered by column.
#[derive(Debug, Clone)]
pub struct PositionalTable {
    cutoffs: Vec<f64>,
    criteria: Vec<Criterion>,
    rows: Vec<PositionalStatistic>
}

impl PositionalTable {
    pub fn new(cutoffs: Vec<f64>, rows: Vec<PositionalStatistic>) -> Self {
        return Self {
            cutoffs: cutoffs,
            criteria: Vec::new(),
            rows: rows
        };
    }

    pub fn get_cutoffs(&self) -> &[f64] {
        return &self.cutoffs;
    }

    pub fn get_criteria(&self) -> &[Criterion] {
        return &self.criteria;
    }

    pub fn get_rows(&self) -> &[PositionalStatistic] {
        return &self.rows;
    }

    fn cutoff_index(&self, cutoff: f64) -> Option<usize> {
        return self.cutoffs.iter().position(|known| *known == cutoff);
    }

    /// Evaluates `criterion` on every row and stores the flags. Returns the flags in row order.
    /// The criterion cutoff has to be one of the table cutoffs.
    pub fn add_criterion(&mut self, criterion: Criterion) -> Option<Vec<bool>> {
        let cutoff_index = self.cutoff_index(criterion.get_cutoff())?;
        let mut flags: Vec<bool> = Vec::with_capacity(self.rows.len());
        for row in self.rows.iter_mut() {
            let flag = criterion.is_met(row.get_minor_allele_fraction(), row.get_contact_fractions()[cutoff_index]);
            row.push_criterion_flag(flag);
            flags.push(flag);
        }
        self.criteria.push(criterion);
        return Some(flags);
    }
}
