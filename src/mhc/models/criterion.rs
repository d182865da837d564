use crate::mhc::errors::PipelineError;

/// Prints floats the way they appear in column names, always with a decimal point (`4.0`, `0.1`).
pub fn format_float(value: f64) -> String {
    return format!("{:?}", value);
}

/// Position selection rule: minimal minor allele fraction, distance cutoff
/// and minimal fraction of structures with a contact within that cutoff.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Criterion {
    min_minor_allele_fraction: f64,
    cutoff: f64,
    min_contact_fraction: f64
}

impl Criterion {
    pub fn new(min_minor_allele_fraction: f64, cutoff: f64, min_contact_fraction: f64) -> Self {
        return Self {
            min_minor_allele_fraction: min_minor_allele_fraction,
            cutoff: cutoff,
            min_contact_fraction: min_contact_fraction
        };
    }

    /// Parses the CLI triple `MAF CUTOFF FRACTION`.
    pub fn from_values(values: &[&str]) -> Result<Self, PipelineError> {
        if values.len() != 3 {
            return Err(PipelineError::Argument(format!("a criterion needs exactly 3 values, got {}", values.len())));
        }
        let mut parsed: [f64; 3] = [0.0; 3];
        for (i, value) in values.iter().enumerate() {
            parsed[i] = value.trim().parse::<f64>()
                .map_err(|_| PipelineError::Argument(format!("could not parse criterion value '{}' to float", value)))?;
        }
        if parsed[1] <= 0.0 {
            return Err(PipelineError::Argument(format!("criterion cutoff must be positive, got {}", parsed[1])));
        }
        return Ok(Self::new(parsed[0], parsed[1], parsed[2]));
    }

    pub fn get_cutoff(&self) -> f64 {
        return self.cutoff;
    }

    pub fn name(&self) -> String {
        return format!(
            "maf_{}_and_{}_within_{}_angstrom",
            format_float(self.min_minor_allele_fraction),
            format_float(self.min_contact_fraction),
            format_float(self.cutoff)
        );
    }

    pub fn is_met(&self, minor_allele_fraction: f64, contact_fraction: f64) -> bool {
        return minor_allele_fraction >= self.min_minor_allele_fraction
            && contact_fraction >= self.min_contact_fraction;
    }
}
