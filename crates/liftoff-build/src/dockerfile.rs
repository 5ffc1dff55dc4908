use liftoff_core::BuildConfig;

/// Generates a Dockerfile for the packaged Python service.
pub struct DockerfileGenerator<'a> {
    config: &'a BuildConfig,
    port: u16,
    startup_command: &'a str,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(config: &'a BuildConfig, port: u16, startup_command: &'a str) -> Self {
        Self {
            config,
            port,
            startup_command,
        }
    }

    pub fn render(&self) -> String {
        let extra_packages = if self.config.extra_packages.is_empty() {
            String::new()
        } else {
            format!(
                "RUN apt-get update && apt-get install -y --no-install-recommends {} && rm -rf /var/lib/apt/lists/*\n",
                self.config.extra_packages.join(" ")
            )
        };

        let has_requirements = self
            .config
            .include
            .iter()
            .any(|p| p.trim_end_matches('/') == "requirements.txt");
        let dependencies = if has_requirements {
            "COPY requirements.txt requirements.txt\n\
             RUN pip install --no-cache-dir -r requirements.txt\n"
        } else {
            ""
        };

        format!(
            r#"FROM {base}
ENV PYTHONUNBUFFERED=1
WORKDIR /app
{extra_packages}{dependencies}COPY . .
ENV PORT={port}
EXPOSE {port}
CMD {cmd}
"#,
            base = self.config.base_image,
            port = self.port,
            cmd = cmd_form(self.startup_command),
        )
    }
}

/// Characters that need `/bin/sh` to interpret the command line.
const SHELL_SYNTAX: &[char] = &[
    '\'', '"', '\\', '$', '`', '|', '&', ';', '<', '>', '(', ')', '*', '?', '[', '{', '~', '#',
];

/// Render the `CMD` argument for `command`.
///
/// Plain words become an exec-form array so the service runs as PID 1.
/// Anything with quoting, expansion, or operators is left to the shell form
/// rather than split here.
fn cmd_form(command: &str) -> String {
    if command.contains(SHELL_SYNTAX) || command.contains('\n') {
        return command.trim().to_owned();
    }
    let parts = command
        .split_whitespace()
        .map(|part| format!("\"{part}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{parts}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_use_exec_form() {
        assert_eq!(
            cmd_form("python web_viewer.py"),
            r#"["python", "web_viewer.py"]"#
        );
    }

    #[test]
    fn quoted_arguments_use_shell_form() {
        assert_eq!(
            cmd_form(r#"gunicorn -b "0.0.0.0:8080" app:app"#),
            r#"gunicorn -b "0.0.0.0:8080" app:app"#
        );
        assert_eq!(
            cmd_form("python -c 'print(1)'"),
            "python -c 'print(1)'"
        );
    }

    #[test]
    fn expansion_and_operators_use_shell_form() {
        assert_eq!(
            cmd_form("gunicorn -b 0.0.0.0:$PORT app:app"),
            "gunicorn -b 0.0.0.0:$PORT app:app"
        );
        assert_eq!(
            cmd_form("python migrate.py && python web_viewer.py"),
            "python migrate.py && python web_viewer.py"
        );
    }
}
