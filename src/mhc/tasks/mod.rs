use crate::mhc::errors::PipelineError;

pub mod allele_sequences;
pub mod assign_pdb_sequences;
pub mod extract_pdb_sequences;
pub mod filter_sequences;
pub mod pseudosequences;
#[cfg(test)]
mod tests;

pub fn required_value(cli_args: &clap::ArgMatches, name: &str) -> Result<String, PipelineError> {
    return match cli_args.value_of(name) {
        Some(value) => Ok(value.to_owned()),
        None => Err(PipelineError::Argument(format!("no {} specified", name)))
    };
}

pub fn parse_value<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, PipelineError> {
    return value.trim().parse::<T>()
        .map_err(|_| PipelineError::Argument(format!("could not parse {} '{}'", name, value)));
}
