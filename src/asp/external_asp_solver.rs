use super::BackdoorOracle;
use crate::aba::MappingError;
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    io::{Read, Write},
    process::{Command, Stdio},
};

/// The logic program computing minimum acyclicity backdoors, to which the facts of a dependency graph are appended.
pub const ACYCLICITY_BACKDOOR_ENCODING: &str = r#"{ backdoor(X) : assumption(X) }.
reach(X,Y) :- edge(X,Y), not backdoor(X), not backdoor(Y).
reach(X,Z) :- reach(X,Y), edge(Y,Z), not backdoor(Z).
:- reach(X,X), assumption(X).
#minimize { 1,X : backdoor(X) }.
#show backdoor/1.
"#;

lazy_static! {
    static ref BACKDOOR_ATOM_PATTERN: Regex = Regex::new(r"^backdoor\(([^()\s]+)\)$").unwrap();
}

/// A backdoor oracle which computation is made by an external ASP solver.
///
/// The system command is composed by an executable program, and a potential list of CLI arguments.
/// The solver must read the program from its standard input and write its models following the output format of Clingo:
/// each model is given on the line following an `Answer: n` line.
/// Among the models that are output, the last one of minimum size is returned.
pub struct ExternalAspBackdoorOracle {
    program: String,
    options: Vec<String>,
}

impl ExternalAspBackdoorOracle {
    /// Builds a new external ASP oracle.
    ///
    /// The `program` argument is the path from a directory in execution path to the software to execute.
    /// The `options` parameter is the CLI options to provide to the software under execution.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use abadoor::asp::{BackdoorOracle, ExternalAspBackdoorOracle};
    /// let oracle = ExternalAspBackdoorOracle::new("clingo".to_string(), vec![]);
    /// let facts = "node(a0).\nnode(a1).\nassumption(a0).\nassumption(a1).\nedge(a0,a1).\nedge(a1,a0).\n";
    /// assert_eq!(1, oracle.minimum_backdoor(facts).unwrap().len());
    /// ```
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self { program, options }
    }

    fn exec_solver(&self, input: String) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.options)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn the ASP solver {}", self.program))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("failed to open the stdin of the ASP solver"))?;
        let writer = std::thread::spawn(move || {
            let _ = stdin.write_all(input.as_bytes());
            let _ = stdin.flush();
        });
        let mut output = String::new();
        child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("failed to open the stdout of the ASP solver"))?
            .read_to_string(&mut output)
            .context("failed to read the output of the ASP solver")?;
        let _ = writer.join();
        child.wait().context("failed to wait for the ASP solver")?;
        Ok(output)
    }
}

impl BackdoorOracle for ExternalAspBackdoorOracle {
    fn minimum_backdoor(&self, facts: &str) -> Result<Vec<String>> {
        let output = self.exec_solver(format!("{}{}", ACYCLICITY_BACKDOOR_ENCODING, facts))?;
        let models = read_models(&output).context("while reading the ASP solver output")?;
        models
            .into_iter()
            .rev()
            .min_by_key(|m| m.len())
            .ok_or_else(|| {
                MappingError::MalformedAnswer("the solver output contains no model".to_string())
            })
            .context("while reading the ASP solver output")
    }
}

fn read_models(output: &str) -> Result<Vec<Vec<String>>, MappingError> {
    let mut models = Vec::new();
    let mut lines = output.lines();
    while let Some(line) = lines.next() {
        if !line.starts_with("Answer:") {
            continue;
        }
        let model = lines.next().unwrap_or_default();
        models.push(
            model
                .split_whitespace()
                .map(|atom| {
                    BACKDOOR_ATOM_PATTERN
                        .captures(atom)
                        .map(|c| c[1].to_string())
                        .ok_or_else(|| MappingError::MalformedAnswer(atom.to_string()))
                })
                .collect::<Result<Vec<String>, MappingError>>()?,
        );
    }
    Ok(models)
}
