//! Command lines for the external lopper tool.

use lopper_error::{LopperError, LopperResult};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// One `lopper -f --enhanced` run: apply `rules` to `input`, writing `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LopperInvocation {
    pub program: String,
    /// Directory lopper writes auxiliary outputs (Kconfig fragments) into.
    pub outdir: PathBuf,
    pub rules: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Assist and its arguments, passed after `--`. Empty means no assist.
    pub assist: Vec<String>,
}

impl LopperInvocation {
    pub fn new(
        program: impl Into<String>,
        outdir: &Path,
        rules: &Path,
        input: &Path,
        output: &Path,
    ) -> Self {
        Self {
            program: program.into(),
            outdir: outdir.to_path_buf(),
            rules: rules.to_path_buf(),
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            assist: Vec::new(),
        }
    }

    pub fn with_assist<I, S>(mut self, assist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assist = assist.into_iter().map(Into::into).collect();
        self
    }

    /// Arguments after the program name.
    ///
    /// Paths that are not valid UTF-8 are rejected rather than passed on lossily.
    pub fn args(&self) -> LopperResult<Vec<String>> {
        let mut args: Vec<String> = vec![
            "-f".into(),
            "--enhanced".into(),
            "-O".into(),
            utf8(&self.outdir)?,
            "-i".into(),
            utf8(&self.rules)?,
            utf8(&self.input)?,
            utf8(&self.output)?,
        ];
        if !self.assist.is_empty() {
            args.push("--".into());
            args.extend(self.assist.iter().cloned());
        }
        Ok(args)
    }

    /// Full shell command line. The program is used as-is so it may carry its own arguments.
    pub fn command_line(&self) -> LopperResult<String> {
        let mut line = self.program.clone();
        for arg in self.args()? {
            line.push(' ');
            line.push_str(&shell_quote(&arg));
        }
        Ok(line)
    }
}

fn utf8(path: &Path) -> LopperResult<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| LopperError::NonUtf8Path(path.to_path_buf()))
}

/// Quote `arg` for `sh` if it contains anything outside a conservative safe set.
pub fn shell_quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if safe {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}
