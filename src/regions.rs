use clap::ValueEnum;

/// Target marketplace region. Each region maps to a fixed postal code that
/// the session is localized to, so regional pricing and availability show up
/// on subsequent page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Region {
    Us,
    Uk,
    Es,
}

impl Region {
    pub fn code(self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::Es => "es",
        }
    }

    pub fn postal_code(self) -> &'static str {
        match self {
            Region::Us => "10001",
            Region::Uk => "SW1A 1AA",
            Region::Es => "28001",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postal_code_table() {
        assert_eq!(Region::Us.postal_code(), "10001");
        assert_eq!(Region::Uk.postal_code(), "SW1A 1AA");
        assert_eq!(Region::Es.postal_code(), "28001");
    }

    #[test]
    fn test_region_codes() {
        assert_eq!(Region::Us.code(), "us");
        assert_eq!(Region::Uk.code(), "uk");
        assert_eq!(Region::Es.code(), "es");
    }
}
