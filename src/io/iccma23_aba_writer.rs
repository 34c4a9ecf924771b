use super::{specs, ResponseWriter};
use crate::{
    aba::{ABAFramework, Atom},
    utils::LabelType,
};
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for the ABA format and the output format used in the ICCMA 2023 competition.
///
/// Answers to problems are written this way:
///   * extension: the letter `w`, followed by a space and the list of assumption labels, separated by spaces
///   * absence of extension: `NO`
///   * backdoor: the letter `b`, followed by the list of assumption labels
///
/// Frameworks are written in the format read by [`Iccma23ABAReader`](super::Iccma23ABAReader),
/// atoms being numbered by their identifiers plus one.
#[derive(Default)]
pub struct Iccma23ABAWriter;

impl Iccma23ABAWriter {
    /// Writes a framework in the ICCMA 2023 ABA format.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::ABAFramework;
    /// # use abadoor::io::Iccma23ABAWriter;
    /// let framework = ABAFramework::new(
    ///     &["a", "b", "p"],
    ///     &[("p", vec!["a"])],
    ///     &["a", "b"],
    ///     &[("a", Some("b")), ("b", None)],
    /// ).unwrap();
    /// let mut buffer = Vec::new();
    /// Iccma23ABAWriter::default().write_framework(&framework, &mut buffer).unwrap();
    /// assert_eq!("p aba 3\na 1\na 2\nc 1 2\nr 3 1\n", String::from_utf8(buffer).unwrap());
    /// ```
    pub fn write_framework<T>(
        &self,
        framework: &ABAFramework<T>,
        writer: &mut dyn Write,
    ) -> Result<()>
    where
        T: LabelType,
    {
        let context = "while writing an ABA framework";
        writeln!(writer, "p aba {}", framework.n_atoms()).context(context)?;
        for a in framework.iter_assumptions() {
            writeln!(writer, "a {}", a.id() + 1).context(context)?;
        }
        for a in framework.iter_assumptions() {
            if let Some(c) = framework.get_contrary(a.label()).context(context)? {
                writeln!(writer, "c {} {}", a.id() + 1, c.id() + 1).context(context)?;
            }
        }
        for r in framework.iter_rules() {
            write!(writer, "r {}", r.head().id() + 1).context(context)?;
            r.iter_body()
                .try_for_each(|b| write!(writer, " {}", b.id() + 1).context(context))?;
            writeln!(writer).context(context)?;
        }
        writer.flush().context(context)
    }
}

impl<T> ResponseWriter<T> for Iccma23ABAWriter
where
    T: LabelType,
{
    fn write_no_extension(&self, writer: &mut dyn Write) -> Result<()> {
        specs::write_no_extension(writer)
    }

    fn write_single_extension(
        &self,
        writer: &mut dyn Write,
        extension: &[&Atom<T>],
    ) -> Result<()> {
        specs::write_atom_line(writer, "w", extension)
    }

    fn write_backdoor(&self, writer: &mut dyn Write, backdoor: &[&Atom<T>]) -> Result<()> {
        specs::write_atom_line(writer, "b", backdoor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aba::Language,
        io::{Iccma23ABAReader, InstanceReader},
    };

    fn written<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_single_extension() {
        let language = Language::new_with_labels(&[1, 2, 3]);
        let atoms = language.iter().collect::<Vec<_>>();
        assert_eq!(
            "w 1 2 3\n",
            written(|w| Iccma23ABAWriter.write_single_extension(w, &atoms))
        );
    }

    #[test]
    fn test_write_empty_extension() {
        assert_eq!(
            "w\n",
            written(|w| ResponseWriter::<usize>::write_single_extension(
                &Iccma23ABAWriter,
                w,
                &[]
            ))
        );
    }

    #[test]
    fn test_write_extensions() {
        let language = Language::new_with_labels(&["a", "b", "c"]);
        let extensions = vec![
            vec![language.get_atom_by_id(0), language.get_atom_by_id(2)],
            vec![language.get_atom_by_id(1)],
        ];
        assert_eq!(
            "w a c\nw b\n",
            written(|w| Iccma23ABAWriter.write_extensions(w, &extensions))
        );
    }

    #[test]
    fn test_write_no_extension() {
        assert_eq!(
            "NO\n",
            written(|w| ResponseWriter::<usize>::write_extensions(&Iccma23ABAWriter, w, &[]))
        );
    }

    #[test]
    fn test_write_backdoor() {
        let language = Language::new_with_labels(&[4, 7]);
        let atoms = language.iter().collect::<Vec<_>>();
        assert_eq!(
            "b 4 7\n",
            written(|w| Iccma23ABAWriter.write_backdoor(w, &atoms))
        );
    }

    #[test]
    fn test_write_then_read_framework() {
        let instance = "p aba 6\na 1\na 2\nc 1 5\nr 5 2 3\nr 3\nr 6 4\n";
        let reader = Iccma23ABAReader::default();
        let f = reader.read(&mut instance.as_bytes()).unwrap();
        assert_eq!(
            instance,
            written(|w| Iccma23ABAWriter.write_framework(&f, w))
        );
    }
}
