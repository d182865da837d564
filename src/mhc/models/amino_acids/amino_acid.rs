/// (one letter code, three letter code)
type AminoAcidTupel = (char, &'static str);

const A: AminoAcidTupel = ('A', "ALA");
const R: AminoAcidTupel = ('R', "ARG");
const N: AminoAcidTupel = ('N', "ASN");
const D: AminoAcidTupel = ('D', "ASP");
const C: AminoAcidTupel = ('C', "CYS");
const E: AminoAcidTupel = ('E', "GLU");
const Q: AminoAcidTupel = ('Q', "GLN");
const G: AminoAcidTupel = ('G', "GLY");
const H: AminoAcidTupel = ('H', "HIS");
const I: AminoAcidTupel = ('I', "ILE");
const L: AminoAcidTupel = ('L', "LEU");
const K: AminoAcidTupel = ('K', "LYS");
const M: AminoAcidTupel = ('M', "MET");
const F: AminoAcidTupel = ('F', "PHE");
const P: AminoAcidTupel = ('P', "PRO");
const O: AminoAcidTupel = ('O', "PYL");
const S: AminoAcidTupel = ('S', "SER");
const T: AminoAcidTupel = ('T', "THR");
const U: AminoAcidTupel = ('U', "SEC");
const V: AminoAcidTupel = ('V', "VAL");
const W: AminoAcidTupel = ('W', "TRP");
const Y: AminoAcidTupel = ('Y', "TYR");
/** Structures use UNK for residues of unknown identity */
const X: AminoAcidTupel = ('X', "UNK");

const STANDARD_AMINO_ACIDS: [AminoAcidTupel; 23] = [A, R, N, D, C, E, Q, G, H, I, L, K, M, F, P, O, S, T, U, V, W, Y, X];

/// Modified residues commonly found in MHC structures, mapped to their parent amino acid.
const MODIFIED_RESIDUES: [(&'static str, char); 10] = [
    ("MSE", 'M'),
    ("SEP", 'S'),
    ("TPO", 'T'),
    ("PTR", 'Y'),
    ("HYP", 'P'),
    ("PCA", 'E'),
    ("CSO", 'C'),
    ("CME", 'C'),
    ("MLY", 'K'),
    ("NEP", 'H')
];

pub const PLACEHOLDER: char = 'X';

pub struct AminoAcid {
    one_letter_code: char
}

impl AminoAcid {
    fn new(amino_acid_tupel: AminoAcidTupel) -> AminoAcid {
        return AminoAcid {
            one_letter_code: amino_acid_tupel.0
        }
    }

    pub fn get_one_letter_code(&self) -> char {
        return self.one_letter_code;
    }

    fn get(one_letter_code: char) -> Option<AminoAcid> {
        return STANDARD_AMINO_ACIDS.iter()
            .find(|amino_acid| amino_acid.0 == one_letter_code)
            .map(|amino_acid| AminoAcid::new(*amino_acid));
    }

    /// Resolves a residue name from a structure file, modified residues included.
    /// Returns `None` for anything which is not an amino acid (water, ligands, nucleotides).
    pub fn from_residue_name(residue_name: &str) -> Option<AminoAcid> {
        let residue_name = residue_name.trim().to_ascii_uppercase();
        if let Some(amino_acid) = STANDARD_AMINO_ACIDS.iter().find(|amino_acid| amino_acid.1 == residue_name) {
            return Some(AminoAcid::new(*amino_acid));
        }
        return MODIFIED_RESIDUES.iter()
            .find(|(name, _)| *name == residue_name)
            .and_then(|(_, parent)| AminoAcid::get(*parent));
    }
}
