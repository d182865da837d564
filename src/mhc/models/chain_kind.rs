use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChainKind {
    Alpha,
    Beta
}

impl ChainKind {
    pub fn all() -> [ChainKind; 2] {
        return [ChainKind::Alpha, ChainKind::Beta];
    }

    pub fn as_str(&self) -> &'static str {
        return match self {
            ChainKind::Alpha => "alpha",
            ChainKind::Beta => "beta"
        };
    }

    pub fn from_str(kind: &str) -> Option<ChainKind> {
        return match kind.trim().to_lowercase().as_str() {
            "alpha" => Some(ChainKind::Alpha),
            "beta" => Some(ChainKind::Beta),
            _ => None
        };
    }
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
