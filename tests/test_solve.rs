use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::predicate;
use std::path::Path;

const MUTUAL_ATTACK: &str = "p aba 4\na 1\na 2\nc 1 3\nc 2 4\nr 3 2\nr 4 1\n";

const SELF_ATTACK: &str = "p aba 1\na 1\nc 1 1\n";

const TONI: &str = r#"p aba 8
# the example of Toni's tutorial
a 1
a 2
a 3
c 1 6
c 2 7
c 3 8
r 4 5 1
r 5
r 6 2 3
"#;

const EVEN_CYCLE: &str = r#"p aba 8
a 1
a 2
a 3
a 4
c 1 5
c 2 6
c 3 7
c 4 8
r 6 1
r 7 2
r 8 3
r 5 4
"#;

const DEFENDED_BY_FACT: &str = "p aba 5\na 1\na 2\nc 1 4\nc 2 5\nr 4 2\nr 5\n";

fn command_for_instance(
    instance: &str,
    problem: &str,
    additional_args: &[&str],
) -> Result<(Command, NamedTempFile), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("instance.aba")?;
    file.write_str(instance)?;
    let mut cmd = Command::cargo_bin("abadoor")?;
    cmd.arg("solve")
        .arg("-f")
        .arg(file.path())
        .arg("-p")
        .arg(problem)
        .arg("--logging-level")
        .arg("off")
        .args(additional_args);
    Ok((cmd, file))
}

fn test_answer(
    instance: &str,
    problem: &str,
    additional_args: &[&str],
    expected: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut cmd, file) = command_for_instance(instance, problem, additional_args)?;
    cmd.assert().success().stdout(predicate::eq(expected));
    file.close()?;
    Ok(())
}

fn test_failure(instance: &str, problem: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (mut cmd, file) = command_for_instance(instance, problem, &[])?;
    cmd.assert().failure();
    file.close()?;
    Ok(())
}

macro_rules! for_each_closure_oracle {
    ($name:ident, $instance:expr, $problem:expr, $expected:expr) => {
        paste::paste! {
            #[test]
            fn [<$name _embedded>]() -> Result<(), Box<dyn std::error::Error>> {
                test_answer($instance, $problem, &["--closure-oracle", "embedded"], $expected)
            }

            #[test]
            fn [<$name _cadical>]() -> Result<(), Box<dyn std::error::Error>> {
                test_answer($instance, $problem, &["--closure-oracle", "cadical"], $expected)
            }
        }
    };
}

for_each_closure_oracle!(test_mutual_attack_ee_pr, MUTUAL_ATTACK, "EE-PR", "w 1\nw 2\n");
for_each_closure_oracle!(test_mutual_attack_se_pr, MUTUAL_ATTACK, "SE-PR", "w 1\n");
for_each_closure_oracle!(test_mutual_attack_se_gr, MUTUAL_ATTACK, "SE-GR", "w\n");
for_each_closure_oracle!(test_mutual_attack_bd, MUTUAL_ATTACK, "BD", "b 1\n");
for_each_closure_oracle!(test_self_attack_ee_pr, SELF_ATTACK, "EE-PR", "w\n");
for_each_closure_oracle!(test_self_attack_se_gr, SELF_ATTACK, "SE-GR", "w\n");
for_each_closure_oracle!(test_toni_ee_pr, TONI, "EE-PR", "w 2 3\n");
for_each_closure_oracle!(test_toni_se_gr, TONI, "SE-GR", "w 2 3\n");
for_each_closure_oracle!(test_toni_bd, TONI, "BD", "b\n");
for_each_closure_oracle!(test_even_cycle_ee_pr, EVEN_CYCLE, "EE-PR", "w 1 3\nw 2 4\n");
for_each_closure_oracle!(test_defended_ee_pr, DEFENDED_BY_FACT, "EE-PR", "w 1\n");
for_each_closure_oracle!(test_defended_se_gr, DEFENDED_BY_FACT, "SE-GR", "w 1\n");

#[test]
fn test_lowercase_problem() -> Result<(), Box<dyn std::error::Error>> {
    test_answer(MUTUAL_ATTACK, "ee-pr", &[], "w 1\nw 2\n")
}

#[test]
fn test_logs_on_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("instance.aba")?;
    file.write_str(MUTUAL_ATTACK)?;
    let mut cmd = Command::cargo_bin("abadoor")?;
    cmd.arg("solve").arg("-f").arg(file.path()).arg("-p").arg("EE-PR");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("backdoor of size 1"))
        .stdout(predicate::str::contains("w 1\nw 2\n"));
    file.close()?;
    Ok(())
}

#[test]
fn test_unknown_problem() -> Result<(), Box<dyn std::error::Error>> {
    test_failure(MUTUAL_ATTACK, "DC-PR")
}

#[test]
fn test_not_flat() -> Result<(), Box<dyn std::error::Error>> {
    test_failure("p aba 2\na 1\nc 1 2\nr 1 2\n", "EE-PR")
}

#[test]
fn test_malformed_instance() -> Result<(), Box<dyn std::error::Error>> {
    test_failure("p af 2\n", "EE-PR")
}

#[test]
fn test_missing_file() {
    let mut cmd = Command::cargo_bin("abadoor").unwrap();
    cmd.arg("solve")
        .arg("-f")
        .arg("/does/not/exist.aba")
        .arg("-p")
        .arg("EE-PR")
        .arg("--logging-level")
        .arg("off");
    cmd.assert().failure();
}

fn echo_path() -> Option<&'static str> {
    ["/bin/echo", "/usr/bin/echo"]
        .into_iter()
        .find(|p| cfg!(target_family = "unix") && Path::new(p).exists())
}

#[test]
fn test_external_asp_solver() -> Result<(), Box<dyn std::error::Error>> {
    let echo = match echo_path() {
        Some(p) => p,
        None => return Ok(()),
    };
    test_answer(
        MUTUAL_ATTACK,
        "BD",
        &[
            "--asp-solver",
            echo,
            "--asp-solver-opt",
            "Answer: 1\nbackdoor(a0) backdoor(a1)\nAnswer: 2\nbackdoor(a1)\nOPTIMUM FOUND",
        ],
        "b 2\n",
    )?;
    test_answer(
        MUTUAL_ATTACK,
        "EE-PR",
        &["--asp-solver", echo, "--asp-solver-opt", "Answer: 1\nbackdoor(a1)"],
        "w 1\nw 2\n",
    )
}

#[test]
fn test_external_asp_solver_wrong_answer() -> Result<(), Box<dyn std::error::Error>> {
    let echo = match echo_path() {
        Some(p) => p,
        None => return Ok(()),
    };
    let (mut cmd, file) = command_for_instance(
        MUTUAL_ATTACK,
        "EE-PR",
        &["--asp-solver", echo, "--asp-solver-opt", "Answer: 1\nbackdoor(a2)"],
    )?;
    cmd.assert().failure();
    file.close()?;
    Ok(())
}
