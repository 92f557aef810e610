// ─── Launch Script ───
// Renders the start script that puts the classpath together and starts the
// located runtime. Regenerated on every run.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::core::config::{LaunchSettings, ScriptFlavor};
use crate::core::error::{BootstrapError, BootstrapResult};
use crate::core::report::{UnitKind, UnitOutcome, UnitReport};

use super::classpath::Classpath;

/// Everything a script needs, already resolved.
#[derive(Debug, Clone)]
pub struct ScriptInputs {
    pub primary_archive: String,
    pub main_class: String,
    /// `minecraftArguments` with placeholders substituted.
    pub game_arguments: String,
    /// Game directory relative to the program directory, `/`-separated.
    pub game_dir: String,
    pub classpath: Classpath,
    /// Absolute path of the located runtime, if any.
    pub java: Option<PathBuf>,
}

pub fn render_script(flavor: ScriptFlavor, inputs: &ScriptInputs, settings: &LaunchSettings) -> String {
    match flavor {
        ScriptFlavor::Batch => render_batch(inputs, settings),
        ScriptFlavor::Shell => render_shell(inputs, settings),
    }
}

fn java_command(inputs: &ScriptInputs, settings: &LaunchSettings, quote: fn(&str) -> String) -> String {
    match &inputs.java {
        Some(path) => quote(&path.to_string_lossy()),
        None => settings.fallback_java.clone(),
    }
}

fn batch_path(rel: &str) -> String {
    rel.split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\\")
}

fn batch_quote(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', ""))
}

fn render_batch(inputs: &ScriptInputs, settings: &LaunchSettings) -> String {
    let game_dir = batch_path(&inputs.game_dir);
    let classpath = inputs.classpath.render("%LIB_DIR%", '\\', ';');
    let java = java_command(inputs, settings, batch_quote);

    let mut lines = vec![
        "@echo off".to_string(),
        "setlocal enabledelayedexpansion".to_string(),
        format!(":: Generated by legacy-bootstrap at {}", Utc::now().to_rfc3339()),
        String::new(),
        format!("set MC_JAR={}", inputs.primary_archive),
        format!("set MAIN_CLASS={}", inputs.main_class),
        format!("set MC_ARGS={}", inputs.game_arguments),
        format!("set LIB_DIR={}\\libraries", game_dir),
        format!("set NATIVE_LIB_DIR={}\\natives", game_dir),
        String::new(),
        format!(
            "if not exist {dir}\\assets mkdir {dir}\\assets",
            dir = game_dir
        ),
        String::new(),
        format!("set CLASSPATH={}", classpath),
        String::new(),
        format!("echo Launching %MC_JAR%... > {}", settings.log_file),
    ];
    lines.push(format!(
        "{java} -Djava.library.path=\"%NATIVE_LIB_DIR%\" \
         -Dorg.lwjgl.opengl.Display.allowSoftwareOpenGL=true \
         -Dorg.lwjgl.openal.libname=\"%NATIVE_LIB_DIR%\\{openal}\" \
         -cp \"%CLASSPATH%\" %MAIN_CLASS% %MC_ARGS% >> {log} 2>&1",
        java = java,
        openal = settings.openal_library,
        log = settings.log_file,
    ));
    lines.push(String::new());
    lines.push("endlocal".to_string());

    let mut script = lines.join("\r\n");
    script.push_str("\r\n");
    script
}

/// Single-quote `raw` for a POSIX shell unless it is made only of
/// characters that never need quoting.
fn shell_quote(raw: &str) -> String {
    if raw.is_empty() {
        return "''".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '=' | ',' | '+')
    }) {
        return raw.to_string();
    }

    format!("'{}'", raw.replace('\'', "'\\''"))
}

fn render_shell(inputs: &ScriptInputs, settings: &LaunchSettings) -> String {
    let game_dir = inputs.game_dir.trim_matches('/');
    let classpath = inputs.classpath.render("$LIB_DIR", '/', ':');
    let java = java_command(inputs, settings, shell_quote);
    let game_args = inputs
        .game_arguments
        .split_whitespace()
        .map(shell_quote)
        .collect::<Vec<_>>()
        .join(" ");

    let lines = vec![
        "#!/bin/sh".to_string(),
        format!("# Generated by legacy-bootstrap at {}", Utc::now().to_rfc3339()),
        String::new(),
        "cd \"$(dirname \"$0\")\" || exit 1".to_string(),
        String::new(),
        format!("MC_JAR={}", shell_quote(&inputs.primary_archive)),
        format!("MAIN_CLASS={}", shell_quote(&inputs.main_class)),
        format!("LIB_DIR={}", shell_quote(&format!("{}/libraries", game_dir))),
        format!(
            "NATIVE_LIB_DIR={}",
            shell_quote(&format!("{}/natives", game_dir))
        ),
        String::new(),
        format!("mkdir -p {}", shell_quote(&format!("{}/assets", game_dir))),
        String::new(),
        format!("CLASSPATH=\"{}\"", classpath),
        String::new(),
        format!("echo \"Launching $MC_JAR...\" > {}", shell_quote(&settings.log_file)),
        format!(
            "exec {java} -Djava.library.path=\"$NATIVE_LIB_DIR\" \
             -Dorg.lwjgl.opengl.Display.allowSoftwareOpenGL=true \
             -Dorg.lwjgl.openal.libname=\"$NATIVE_LIB_DIR/{openal}\" \
             -cp \"$CLASSPATH\" \"$MAIN_CLASS\" {args} >> {log} 2>&1",
            java = java,
            openal = settings.openal_library,
            args = game_args,
            log = shell_quote(&settings.log_file),
        ),
    ];

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// Render and write the script into `root`, marking it executable on Unix.
pub async fn write_script(
    root: &Path,
    flavor: ScriptFlavor,
    inputs: &ScriptInputs,
    settings: &LaunchSettings,
) -> UnitReport {
    let name = settings.effective_script_name();
    let path = root.join(&name);

    if inputs.java.is_none() {
        warn!(
            "Generating {} without a Java path; set JAVA_HOME or install Java 8",
            name
        );
    }

    let script = render_script(flavor, inputs, settings);
    match persist(&path, &script).await {
        Ok(()) => {
            info!("Generated {:?}", path);
            UnitReport::new(UnitKind::LaunchScript, name, UnitOutcome::Installed)
        }
        Err(e) => {
            warn!("Failed to write launch script: {}", e);
            UnitReport::new(UnitKind::LaunchScript, name, UnitOutcome::Failed(e.to_string()))
        }
    }
}

async fn persist(path: &Path, script: &str) -> BootstrapResult<()> {
    tokio::fs::write(path, script)
        .await
        .map_err(|source| BootstrapError::io(path, source))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = tokio::fs::metadata(path)
            .await
            .map_err(|source| BootstrapError::io(path, source))?
            .permissions();
        perms.set_mode(0o755);
        tokio::fs::set_permissions(path, perms)
            .await
            .map_err(|source| BootstrapError::io(path, source))?;
    }

    Ok(())
}
