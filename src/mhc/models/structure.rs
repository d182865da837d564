use std::collections::HashMap;

use pdbtbx::PDB;

use crate::mhc::models::amino_acids::amino_acid::AminoAcid;

pub type Coordinate = (f64, f64, f64);

/// (chain index, residue index) of an amino-acid residue inside one structure
pub type ResidueKey = (usize, usize);

/// Amino-acid residue of a structure chain.
#[derive(Debug, Clone)]
pub struct StructureResidue {
    code: char,
    atoms: Vec<Coordinate>
}

impl StructureResidue {
    pub fn get_code(&self) -> char {
        return self.code;
    }

    pub fn get_atoms(&self) -> &[Coordinate] {
        return &self.atoms;
    }
}

#[derive(Debug, Clone)]
pub struct StructureChain {
    id: String,
    residues: Vec<StructureResidue>,
    // pdbtbx residue id -> residue index
    residue_ids: HashMap<(isize, Option<String>), usize>
}

impl StructureChain {
    fn new(id: &str) -> Self {
        return Self {
            id: id.to_owned(),
            residues: Vec::new(),
            residue_ids: HashMap::new()
        };
    }

    fn push_residue(&mut self, residue_id: (isize, Option<&str>), code: char, atoms: Vec<Coordinate>) {
        self.residue_ids.insert((residue_id.0, residue_id.1.map(|code| code.to_owned())), self.residues.len());
        self.residues.push(StructureResidue {
            code: code,
            atoms: atoms
        });
    }

    pub fn get_id(&self) -> &str {
        return self.id.as_str();
    }

    pub fn get_residues(&self) -> &[StructureResidue] {
        return &self.residues;
    }

    pub fn len(&self) -> usize {
        return self.residues.len();
    }

    pub fn sequence(&self) -> String {
        return self.residues.iter().map(|residue| residue.get_code()).collect();
    }

    pub fn residue_index(&self, residue_id: (isize, Option<&str>)) -> Option<usize> {
        return self.residue_ids.get(&(residue_id.0, residue_id.1.map(|code| code.to_owned()))).cloned();
    }
}

/// A PDB entry together with the amino-acid residues of its first model.
/// Residue indices count amino acids only, so they line up with the chain sequences.
#[derive(Debug, Clone)]
pub struct Structure {
    accession: String,
    pdb: PDB,
    model_serial_number: Option<usize>,
    chains: Vec<StructureChain>
}

impl Structure {
    pub fn from_pdb(accession: &str, pdb: PDB) -> Self {
        let mut chains: Vec<StructureChain> = Vec::new();
        let mut model_serial_number: Option<usize> = None;
        if let Some(model) = pdb.models().next() {
            model_serial_number = Some(model.serial_number());
            for chain in model.chains() {
                let mut structure_chain = StructureChain::new(chain.id());
                for residue in chain.residues() {
                    let amino_acid = match residue.name().and_then(AminoAcid::from_residue_name) {
                        Some(amino_acid) => amino_acid,
                        None => continue
                    };
                    let atoms = residue.atoms().map(|atom| atom.pos()).collect();
                    structure_chain.push_residue(residue.id(), amino_acid.get_one_letter_code(), atoms);
                }
                if structure_chain.len() > 0 {
                    chains.push(structure_chain);
                }
            }
        }
        return Self {
            accession: accession.to_owned(),
            pdb: pdb,
            model_serial_number: model_serial_number,
            chains: chains
        };
    }

    pub fn get_accession(&self) -> &str {
        return self.accession.as_str();
    }

    pub fn get_pdb(&self) -> &PDB {
        return &self.pdb;
    }

    pub fn get_model_serial_number(&self) -> Option<usize> {
        return self.model_serial_number;
    }

    pub fn get_chains(&self) -> &[StructureChain] {
        return &self.chains;
    }

    /// Looks up an amino-acid residue of the first model by pdbtbx chain and residue id.
    pub fn residue_key(&self, chain_id: &str, residue_id: (isize, Option<&str>)) -> Option<ResidueKey> {
        let chain_index = self.chains.iter().position(|chain| chain.get_id() == chain_id)?;
        return self.chains[chain_index].residue_index(residue_id).map(|residue_index| (chain_index, residue_index));
    }
}
