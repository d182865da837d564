//! Normalization of MHC class II allele names.
//!
//! Accepted inputs look like `HLA-DRB1*01:01:01:01`, `DRB1*01:01`, `DRB1*0101`,
//! `Mamu-DRA*01:02` or `hla-dqa1*05:01N`. The result keeps species, gene and the
//! first two fields: `HLA-DRB1*01:01`. Names without a `*`, with fewer than two
//! allele fields or naming a null allele are rejected with `None`.

const DEFAULT_SPECIES: &str = "HLA";
/// Expression suffixes of IMGT allele names. N marks null alleles, which are not expressed.
const EXPRESSION_SUFFIXES: [char; 6] = ['N', 'L', 'S', 'Q', 'C', 'A'];

pub fn normalize_allele_name(raw_name: &str) -> Option<String> {
    let name = raw_name.trim();
    let star = name.find('*')?;
    let (prefix, fields) = (&name[..star], &name[star + 1..]);

    let (species, gene) = match prefix.rfind('-') {
        Some(dash) => (&prefix[..dash], &prefix[dash + 1..]),
        None => (DEFAULT_SPECIES, prefix)
    };
    let species = if species.eq_ignore_ascii_case(DEFAULT_SPECIES) { DEFAULT_SPECIES.to_owned() } else { species.to_owned() };
    if species.is_empty() || !species.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    if gene.is_empty() || !gene.chars().next().map_or(false, |c| c.is_ascii_alphabetic()) || !gene.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let gene = if species == DEFAULT_SPECIES { gene.to_ascii_uppercase() } else { gene.to_owned() };

    let (first, second) = allele_fields(fields)?;
    return Some(format!("{}-{}*{}:{}", species, gene, first, second));
}

/// First two allele fields, from `01:01:01N` or the compact `0101` form.
fn allele_fields(fields: &str) -> Option<(String, String)> {
    let mut fields = fields.trim().to_owned();
    if let Some(last) = fields.chars().last() {
        if EXPRESSION_SUFFIXES.contains(&last.to_ascii_uppercase()) {
            if last.to_ascii_uppercase() == 'N' {
                return None;
            }
            fields.pop();
        }
    }
    let parts: Vec<&str> = fields.split(':').collect();
    let (first, second) = if parts.len() >= 2 {
        (parts[0].to_owned(), parts[1].to_owned())
    } else if parts[0].len() >= 4 && parts[0].is_ascii() {
        (parts[0][..2].to_owned(), parts[0][2..].to_owned())
    } else {
        return None;
    };
    if first.is_empty() || second.is_empty() {
        return None;
    }
    if !first.chars().all(|c| c.is_ascii_digit()) || !second.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    return Some((first, second));
}
