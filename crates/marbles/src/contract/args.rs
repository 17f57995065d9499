use marbles_core::model::{ArgumentError, positive_integer};

///
/// Args
/// Positional string arguments of one invocation.
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct Args<'a> {
    operation: &'static str,
    values: &'a [&'a str],
}

impl<'a> Args<'a> {
    pub(crate) const fn new(operation: &'static str, values: &'a [&'a str]) -> Self {
        Self { operation, values }
    }

    pub(crate) const fn len(&self) -> usize {
        self.values.len()
    }

    /// Require exactly `n` arguments.
    pub(crate) fn exact(&self, n: usize) -> Result<(), ArgumentError> {
        if self.values.len() != n {
            return Err(self.arity(n));
        }

        Ok(())
    }

    /// Require at least `n` arguments; extras are ignored.
    pub(crate) fn at_least(&self, n: usize) -> Result<(), ArgumentError> {
        if self.values.len() < n {
            return Err(self.arity(n));
        }

        Ok(())
    }

    /// Argument `i`, or `""` when absent.
    pub(crate) fn get(&self, i: usize) -> &'a str {
        self.values.get(i).copied().unwrap_or_default()
    }

    /// Argument `i` as a page size in `1..=max`.
    pub(crate) fn page_size(&self, i: usize, max: u32) -> Result<u32, ArgumentError> {
        let size = positive_integer("pageSize", self.get(i))?;

        u32::try_from(size)
            .ok()
            .filter(|size| *size <= max)
            .ok_or(ArgumentError::TooLarge {
                field: "pageSize",
                max: u64::from(max),
                got: size,
            })
    }

    fn arity(&self, expected: usize) -> ArgumentError {
        ArgumentError::Arity {
            operation: self.operation,
            expected,
            got: self.values.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_checks_report_counts() {
        let values = ["a"];
        let args = Args::new("transferMarble", &values);

        assert!(args.at_least(1).is_ok());
        assert_eq!(
            args.at_least(2).unwrap_err(),
            ArgumentError::Arity {
                operation: "transferMarble",
                expected: 2,
                got: 1,
            }
        );
        assert!(args.exact(2).is_err());
    }

    #[test]
    fn missing_arguments_read_as_empty() {
        let values = ["a"];
        let args = Args::new("queryMarblesWithPagination", &values);

        assert_eq!(args.get(0), "a");
        assert_eq!(args.get(3), "");
    }

    #[test]
    fn page_size_is_bounded() {
        let values = ["0", "5", "5000", "many"];
        let args = Args::new("getMarblesByRangeWithPagination", &values);

        assert!(matches!(
            args.page_size(0, 100),
            Err(ArgumentError::NotPositive { .. })
        ));
        assert_eq!(args.page_size(1, 100).unwrap(), 5);
        assert!(matches!(
            args.page_size(2, 100),
            Err(ArgumentError::TooLarge { max: 100, got: 5000, .. })
        ));
        assert!(matches!(
            args.page_size(3, 100),
            Err(ArgumentError::NotInteger { .. })
        ));
    }
}
