use std::path::Path;

use csv::Writer;

use crate::mhc::errors::PipelineError;
use crate::mhc::models::aligned_sequence::AlignedSequence;
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::contact::{Contact, CSV_HEADER};
use crate::mhc::models::criterion::format_float;
use crate::mhc::models::positional_statistic::PositionalTable;
use crate::mhc::models::pseudosequence::PseudosequenceTable;
use crate::mhc::utility::visualization::MINOR_ALLELE_FRACTION;

/// Reference alleles whose numbering is added to positional.csv.
pub struct ReferenceAlleles<'a> {
    name: String,
    alpha: &'a AlignedSequence,
    beta: &'a AlignedSequence
}

impl<'a> ReferenceAlleles<'a> {
    /// `alpha_name` and `beta_name` are used as given for the column names.
    pub fn new(alpha_name: &str, beta_name: &str, alpha: &'a AlignedSequence, beta: &'a AlignedSequence) -> Self {
        return Self {
            name: format!("{}/{}", alpha_name, beta_name),
            alpha: alpha,
            beta: beta
        };
    }

    fn of_kind(&self, kind: ChainKind) -> &AlignedSequence {
        return match kind {
            ChainKind::Alpha => self.alpha,
            ChainKind::Beta => self.beta
        };
    }
}

fn create_writer(path: &Path) -> Result<Writer<std::fs::File>, PipelineError> {
    return Ok(Writer::from_path(path)?);
}

fn finish(mut writer: Writer<std::fs::File>, path: &Path) -> Result<(), PipelineError> {
    return writer.flush().map_err(|err| PipelineError::io(&path.display().to_string(), err));
}

/// `allele,<criterion names>,kind`
pub fn write_pseudosequences(path: &Path, table: &PseudosequenceTable) -> Result<(), PipelineError> {
    let mut writer = create_writer(path)?;
    let mut header: Vec<String> = vec!["allele".to_owned()];
    header.extend(table.criterion_names());
    header.push("kind".to_owned());
    writer.write_record(&header)?;
    for record in table.get_records().iter() {
        let mut row: Vec<String> = vec![record.get_allele().to_owned()];
        row.extend(record.get_pseudosequences().iter().cloned());
        row.push(record.get_kind().to_string());
        writer.write_record(&row)?;
    }
    return finish(writer, path);
}

pub fn write_aligned_sequences(path: &Path, table: &PseudosequenceTable) -> Result<(), PipelineError> {
    let mut writer = create_writer(path)?;
    let mut header: Vec<String> = ["allele", "sequence_id", "description", "kind", "aligned_sequence", "unaligned"]
        .iter()
        .map(|column| column.to_string())
        .collect();
    header.extend(table.criterion_names());
    writer.write_record(&header)?;
    for record in table.get_records().iter() {
        let sequence = record.get_sequence();
        let mut row: Vec<String> = vec![
            record.get_allele().to_owned(),
            sequence.get_sequence_id().to_owned(),
            sequence.get_description().to_owned(),
            sequence.get_kind().to_string(),
            sequence.aligned_string(),
            sequence.unaligned_string()
        ];
        row.extend(record.get_pseudosequences().iter().cloned());
        writer.write_record(&row)?;
    }
    return finish(writer, path);
}

pub fn write_contacts(path: &Path, contacts: &[Contact]) -> Result<(), PipelineError> {
    let mut writer = create_writer(path)?;
    writer.write_record(&CSV_HEADER)?;
    for contact in contacts.iter() {
        writer.write_record(&contact.as_csv_record())?;
    }
    return finish(writer, path);
}

/// One row per positional statistic. With reference alleles two columns are appended:
/// the ungapped index of the reference residue at the column (empty for a gap) and the
/// reference residue itself.
pub fn write_positional(path: &Path, table: &PositionalTable, reference: Option<&ReferenceAlleles>) -> Result<(), PipelineError> {
    let mut writer = create_writer(path)?;
    let mut header: Vec<String> = vec![
        "mhc_chain_kind".to_owned(),
        "mhc_residue_aligned".to_owned(),
        "major_allele".to_owned(),
        MINOR_ALLELE_FRACTION.to_owned()
    ];
    header.extend(table.get_cutoffs().iter().map(|cutoff| format_float(*cutoff)));
    header.extend(table.get_criteria().iter().map(|criterion| criterion.name()));
    if let Some(reference) = reference {
        header.push(format!("{} position", reference.name));
        header.push(format!("{} aa", reference.name));
    }
    writer.write_record(&header)?;
    for row in table.get_rows().iter() {
        let mut record: Vec<String> = vec![
            row.get_kind().to_string(),
            row.get_aligned_column().to_string(),
            row.get_major_allele().to_string(),
            format_float(row.get_minor_allele_fraction())
        ];
        record.extend(row.get_contact_fractions().iter().map(|fraction| format_float(*fraction)));
        record.extend(row.get_criteria_flags().iter().map(|flag| if *flag { "True".to_owned() } else { "False".to_owned() }));
        if let Some(reference) = reference {
            let reference_sequence = reference.of_kind(row.get_kind());
            let position = reference_sequence.get_position_map().to_ungapped(row.get_aligned_column());
            record.push(position.map(|position| position.to_string()).unwrap_or_default());
            record.push(reference_sequence.get_aligned().get(row.get_aligned_column()).map(|residue| residue.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    return finish(writer, path);
}
