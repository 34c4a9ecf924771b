use anyhow::{anyhow, Result};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

/// The problems that can be solved on ABA frameworks.
///
/// Problems are named following the ICCMA competition conventions, with a query part and a semantics part.
///
/// # Example
///
/// ```
/// # use abadoor::aba::Problem;
/// assert_eq!(Problem::EnumeratePreferred, Problem::read_problem_string("ee-pr").unwrap());
/// assert_eq!("SE-GR", Problem::SingleGrounded.as_ref());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum Problem {
    /// Enumerate all the preferred extensions
    #[strum(serialize = "EE-PR")]
    EnumeratePreferred,
    /// Compute a single preferred extension
    #[strum(serialize = "SE-PR")]
    SinglePreferred,
    /// Compute the grounded extension
    #[strum(serialize = "SE-GR")]
    SingleGrounded,
    /// Compute a minimum backdoor of the framework reduced by its grounded extension
    #[strum(serialize = "BD")]
    Backdoor,
}

impl Problem {
    /// Reads a problem string.
    ///
    /// An error is returned if the string does not correspond to a problem.
    pub fn read_problem_string(problem: &str) -> Result<Self> {
        Problem::from_str(problem).map_err(|_| anyhow!(r#"undefined problem "{}""#, problem))
    }

    /// Iterates over the string representations of the problems.
    pub fn iter_problem_strings() -> impl Iterator<Item = &'static str> {
        Problem::iter().map(<&'static str>::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_problem_strings() {
        assert_eq!(
            Problem::SinglePreferred,
            Problem::read_problem_string("SE-PR").unwrap()
        );
        assert_eq!(
            Problem::Backdoor,
            Problem::read_problem_string("bd").unwrap()
        );
        assert_eq!(
            r#"undefined problem "DC-PR""#,
            Problem::read_problem_string("DC-PR").unwrap_err().to_string()
        );
    }

    #[test]
    fn test_problem_strings_are_readable() {
        let strings = Problem::iter_problem_strings().collect::<Vec<_>>();
        assert_eq!(vec!["EE-PR", "SE-PR", "SE-GR", "BD"], strings);
        for s in strings {
            assert_eq!(s, Problem::read_problem_string(s).unwrap().as_ref());
        }
    }
}
