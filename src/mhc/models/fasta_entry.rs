
/// One FASTA record. The header is stored without the leading '>'.
#[derive(Debug)]
pub struct FastaEntry {
    header: String,
    sequence: String
}

impl FastaEntry {
    pub fn new(header: &str, sequence: &str) -> Self {
        return Self {
            header: header.trim_start_matches('>').trim().to_owned(),
            sequence: sequence.trim().to_owned()
        }
    }

    /// First whitespace delimited token of the header.
    pub fn get_id(&self) -> &str {
        return self.header.split_whitespace().next().unwrap_or("");
    }

    /// The complete header line, id included.
    pub fn get_description(&self) -> &str {
        return self.header.as_str();
    }

    /// Whitespace delimited header token at `index`. IMGT style descriptions keep the allele name at index 1.
    pub fn get_description_token(&self, index: usize) -> Option<&str> {
        return self.header.split_whitespace().nth(index);
    }

    pub fn get_sequence(&self) -> &str {
        return self.sequence.as_str();
    }

    pub fn len(&self) -> usize {
        return self.sequence.len();
    }

    pub fn to_string(&self) -> String {
        return format!(">{}\n{}\n", self.header.as_str(), self.sequence.as_str())
    }
}

impl PartialEq for FastaEntry {
    fn eq(&self, other: &FastaEntry) -> bool {
        return self.header.eq(&other.header) && self.sequence.eq(&other.sequence);
    }
}

impl Clone for FastaEntry {
    fn clone(&self) -> FastaEntry {
        return FastaEntry {
            header: self.header.clone(),
            sequence: self.sequence.clone()
        }
    }
}
