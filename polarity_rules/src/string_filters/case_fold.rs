use crate::StringFilter;

/// Unicode lowercase filter.
#[derive(Clone, Copy, Default)]
pub struct LowercaseFilter;

impl StringFilter for LowercaseFilter {
    fn filter(&self, string: &str) -> String {
        string.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase() {
        let filter = LowercaseFilter;
        assert_eq!("great product", filter.filter("GREAT Product"));
        assert_eq!("ärger", filter.filter("ÄRGER"));
    }
}
