use anyhow::Result;
use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Run the binary with `args`, feeding `input` on stdin.
pub fn run_cli_on_str(args: &[&str], input: &str) -> Result<Output> {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gn-syntax"));
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    child
        .stdin
        .take()
        .ok_or_else(|| anyhow::anyhow!("stdin not captured"))?
        .write_all(input.as_bytes())?;
    Ok(child.wait_with_output()?)
}

pub fn stdout_of(args: &[&str], input: &str) -> Result<String> {
    let out = run_cli_on_str(args, input)?;
    anyhow::ensure!(out.status.success(), "gn-syntax non-zero: {}", out.status);
    Ok(String::from_utf8(out.stdout)?)
}
