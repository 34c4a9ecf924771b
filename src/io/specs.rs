use crate::{
    aba::{ABAFramework, Atom},
    utils::LabelType,
};
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// The type of callback functions to call when warnings are raised while parsing a framework.
///
/// The first parameter is the index of the line the warning is about, the second one is the message.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

/// A trait implemented by objects able to read ABA frameworks.
pub trait InstanceReader<T>
where
    T: LabelType,
{
    /// Reads an [`ABAFramework`].
    /// The [LabelType](crate::utils::LabelType) of the returned frameworks depends on the reader.
    ///
    /// In case warnings are raised, the callback functions registered by [add_warning_handler](Self::add_warning_handler) are triggered.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::ABAFramework;
    /// # use abadoor::io::{Iccma23ABAReader, InstanceReader};
    /// fn read_framework_from_str(s: &str) -> ABAFramework<usize> {
    ///     let reader = Iccma23ABAReader::default();
    ///     reader.read(&mut s.as_bytes()).expect("invalid ICCMA ABA framework")
    /// }
    /// # read_framework_from_str("p aba 2\na 1\nc 1 2\n");
    /// ```
    fn read(&self, reader: &mut dyn Read) -> Result<ABAFramework<T>>;

    /// Reads an atom from a string.
    fn read_atom_from_str<'a>(
        &self,
        framework: &'a ABAFramework<T>,
        atom: &str,
    ) -> Result<&'a Atom<T>>;

    /// Adds a callback function to call when warnings are raised while parsing a framework.
    fn add_warning_handler(&mut self, h: WarningHandler);
}

/// A trait implemented by objects that write responses to problems.
pub trait ResponseWriter<T>
where
    T: LabelType,
{
    /// Writes the text associated with the fact the problem has no extension.
    fn write_no_extension(&self, writer: &mut dyn Write) -> Result<()>;

    /// Writes a single extension.
    fn write_single_extension(&self, writer: &mut dyn Write, extension: &[&Atom<T>])
        -> Result<()>;

    /// Writes a list of extensions, one per line.
    ///
    /// An empty list is written as the absence of extension.
    fn write_extensions(&self, writer: &mut dyn Write, extensions: &[Vec<&Atom<T>>]) -> Result<()> {
        if extensions.is_empty() {
            return self.write_no_extension(writer);
        }
        extensions
            .iter()
            .try_for_each(|e| self.write_single_extension(writer, e))
    }

    /// Writes a backdoor.
    fn write_backdoor(&self, writer: &mut dyn Write, backdoor: &[&Atom<T>]) -> Result<()>;
}

pub(crate) fn write_no_extension(writer: &mut dyn Write) -> Result<()> {
    let context = "while writing problem has no extension";
    writeln!(writer, "NO").context(context)?;
    writer.flush().context(context)
}

pub(crate) fn write_atom_line<T>(
    writer: &mut dyn Write,
    prefix: &str,
    atoms: &[&Atom<T>],
) -> Result<()>
where
    T: LabelType,
{
    let context = || format!(r#"while writing a "{}" line"#, prefix);
    write!(writer, "{}", prefix).with_context(context)?;
    atoms
        .iter()
        .try_for_each(|a| write!(writer, " {}", a).with_context(context))?;
    writeln!(writer).with_context(context)?;
    writer.flush().with_context(context)
}
