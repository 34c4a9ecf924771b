use super::{specs::WarningHandler, InstanceReader};
use crate::{
    aba::{ABAFramework, Atom},
    sat::{default_oracle_factory, ClosureOracleFactory},
};
use anyhow::{anyhow, Context, Result};
use std::{
    io::{BufRead, BufReader, Read},
    rc::Rc,
};

/// A reader for the ICCMA 2023 ABA format.
///
/// The first line that is not a comment is the preamble `p aba n`, where `n` is the number of atoms.
/// Atoms are labeled by the integers from `1` to `n`.
/// The following lines are made of:
///
/// * assumption declarations: `a i`,
/// * contrary definitions: `c i j`, meaning the contrary of assumption `i` is `j`,
/// * rules: `r h b1 b2 ...`, where `h` is the head and the `bi` are the body atoms.
///
/// Lines beginning with `#` are comments. Empty lines are ignored.
///
/// An assumption with no contrary line is given no contrary, and a warning is raised.
///
/// # Example
///
/// ```
/// # use abadoor::io::{Iccma23ABAReader, InstanceReader};
/// let instance = "p aba 8\na 1\na 2\na 3\nc 1 6\nc 2 7\nc 3 8\nr 4 5 1\nr 5\nr 6 2 3\n";
/// let framework = Iccma23ABAReader::default().read(&mut instance.as_bytes()).unwrap();
/// assert_eq!(8, framework.n_atoms());
/// assert_eq!(3, framework.n_assumptions());
/// assert_eq!(3, framework.n_rules());
/// ```
pub struct Iccma23ABAReader {
    oracle_factory: Rc<dyn ClosureOracleFactory>,
    warning_handlers: Vec<WarningHandler>,
}

impl Default for Iccma23ABAReader {
    fn default() -> Self {
        Self::new_with_oracle_factory(default_oracle_factory())
    }
}

impl Iccma23ABAReader {
    /// Builds a reader which frameworks use the provided factory to create their closure oracles.
    pub fn new_with_oracle_factory(oracle_factory: Rc<dyn ClosureOracleFactory>) -> Self {
        Self {
            oracle_factory,
            warning_handlers: vec![],
        }
    }

    fn warn(&self, line: usize, message: String) {
        self.warning_handlers
            .iter()
            .for_each(|h| h(line, message.clone()));
    }
}

struct RawFramework {
    n_atoms: usize,
    assumption_lines: Vec<Option<usize>>,
    contraries: Vec<Option<usize>>,
    rules: Vec<(usize, Vec<usize>)>,
}

impl RawFramework {
    fn new(n_atoms: usize) -> Self {
        Self {
            n_atoms,
            assumption_lines: vec![None; n_atoms + 1],
            contraries: vec![None; n_atoms + 1],
            rules: vec![],
        }
    }

    fn read_atom_index(&self, word: &str) -> Result<usize> {
        match word.parse::<usize>() {
            Ok(n) if n >= 1 && n <= self.n_atoms => Ok(n),
            _ => Err(anyhow!(r#"invalid atom index "{}""#, word)),
        }
    }
}

fn check_line_len(words: &[&str], line_type: &str, n: usize) -> Result<()> {
    if words.len() != n {
        return Err(anyhow!(
            r#"error in {} line; expected {} words, got {}"#,
            line_type,
            n,
            words.len()
        ));
    }
    Ok(())
}

impl InstanceReader<usize> for Iccma23ABAReader {
    fn read(&self, reader: &mut dyn Read) -> Result<ABAFramework<usize>> {
        let br = BufReader::new(reader);
        let mut raw: Option<RawFramework> = None;
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line with index {}", i);
            let l = line.with_context(context)?;
            let trimmed = l.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let words = trimmed.split_whitespace().collect::<Vec<&str>>();
            let raw = match raw.as_mut() {
                None => {
                    let n_atoms = read_preamble(&words, "aba").with_context(context)?;
                    raw = Some(RawFramework::new(n_atoms));
                    continue;
                }
                Some(r) => r,
            };
            match words[0] {
                "a" => {
                    check_line_len(&words, "assumption", 2).with_context(context)?;
                    let atom = raw.read_atom_index(words[1]).with_context(context)?;
                    if raw.assumption_lines[atom].is_some() {
                        self.warn(i, format!("assumption {} is declared more than once", atom));
                    } else {
                        raw.assumption_lines[atom] = Some(i);
                    }
                }
                "c" => {
                    check_line_len(&words, "contrary", 3).with_context(context)?;
                    let atom = raw.read_atom_index(words[1]).with_context(context)?;
                    let contrary = raw.read_atom_index(words[2]).with_context(context)?;
                    if raw.contraries[atom].is_some() {
                        return Err(anyhow!("multiple contraries for atom {}", atom))
                            .with_context(context);
                    }
                    raw.contraries[atom] = Some(contrary);
                }
                "r" => {
                    if words.len() == 1 {
                        return Err(anyhow!(
                            r#"error in rule line; expected at least 2 words, got {}"#,
                            words.len()
                        ))
                        .with_context(context);
                    }
                    let head = raw.read_atom_index(words[1]).with_context(context)?;
                    let body = words
                        .iter()
                        .skip(2)
                        .map(|w| raw.read_atom_index(w))
                        .collect::<Result<Vec<usize>>>()
                        .with_context(context)?;
                    raw.rules.push((head, body));
                }
                _ => {
                    return Err(anyhow!(r#"unexpected first word "{}""#, words[0]))
                        .with_context(context)
                }
            }
        }
        let raw = raw.ok_or_else(|| anyhow!("missing preamble"))?;
        let language = (1..=raw.n_atoms).collect::<Vec<usize>>();
        let assumptions = language
            .iter()
            .filter(|a| raw.assumption_lines[**a].is_some())
            .copied()
            .collect::<Vec<usize>>();
        let mut contraries = Vec::with_capacity(assumptions.len());
        for atom in language.iter() {
            match (raw.assumption_lines[*atom], raw.contraries[*atom]) {
                (Some(line), None) => {
                    self.warn(line, format!("assumption {} has no contrary", atom));
                    contraries.push((*atom, None));
                }
                (_, Some(c)) => contraries.push((*atom, Some(c))),
                (None, None) => {}
            }
        }
        ABAFramework::new_with_oracle_factory(
            &language,
            &raw.rules,
            &assumptions,
            &contraries,
            Rc::clone(&self.oracle_factory),
        )
        .context("while finalizing the result")
    }

    fn read_atom_from_str<'a>(
        &self,
        framework: &'a ABAFramework<usize>,
        atom: &str,
    ) -> Result<&'a Atom<usize>> {
        match atom.parse::<usize>() {
            Ok(n) if n > 0 && n <= framework.n_atoms() => {
                Ok(framework.language().get_atom_by_id(n - 1))
            }
            _ => Err(anyhow!("unknown atom: {}", atom)),
        }
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}

fn read_preamble(words: &[&str], expected_kind: &str) -> Result<usize> {
    if words.len() != 3 {
        return Err(anyhow!(
            r#"error in preamble; expected 3 words, got {}"#,
            words.len()
        ));
    }
    if words[0] != "p" {
        return Err(anyhow!(
            r#"error in first word of preamble; expected "p", got "{}""#,
            words[0]
        ));
    }
    if words[1] != expected_kind {
        return Err(anyhow!(
            r#"error in second word of preamble; expected "{}", got "{}""#,
            expected_kind,
            words[1]
        ));
    }
    words[2]
        .parse::<usize>()
        .map_err(|_| anyhow!("error in preamble: invalid number of atoms"))
}
