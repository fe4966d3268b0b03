#![deny(unsafe_code)]
//! CLI binary for bandplot.
//!
//! Subcommands:
//! - `render` -- render the reference scene once, write a PNG
//! - `draws` -- render once and print the recorded upload and draw log
//! - `scene` -- print the reference scene

mod error;
mod logging;

use bandplot_core::pipeline::software::Command as GlCommand;
use bandplot_core::snapshot::write_png;
use bandplot_core::{render_once, SceneData, SoftwareBackend, SurfaceSize};
use clap::{Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "bandplot", about = "Draws color bands and point markers")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log filter (e.g. "info", "bandplot_core=debug"). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the reference scene once and write a PNG snapshot.
    Render {
        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: u32,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 600)]
        height: u32,

        /// Output file path.
        #[arg(short, long, default_value = "bandplot.png")]
        output: PathBuf,
    },
    /// Render once and print every upload and draw call in order.
    Draws {
        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: u32,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 600)]
        height: u32,
    },
    /// Print the reference scene.
    Scene,
}

fn command_json(command: &GlCommand) -> serde_json::Value {
    match command {
        GlCommand::Viewport {
            x,
            y,
            width,
            height,
        } => serde_json::json!({"op": "viewport", "x": x, "y": y, "width": width, "height": height}),
        GlCommand::Clear { color } => serde_json::json!({"op": "clear", "color": color}),
        GlCommand::UseProgram(program) => {
            serde_json::json!({"op": "use_program", "program": program.map(|p| format!("{p:?}"))})
        }
        GlCommand::Uniform2f { x, y, .. } => serde_json::json!({"op": "uniform2f", "value": [x, y]}),
        GlCommand::BufferData {
            buffer,
            data,
            usage,
        } => serde_json::json!({
            "op": "buffer_data",
            "buffer": format!("{buffer:?}"),
            "usage": format!("{usage:?}"),
            "data": data,
        }),
        GlCommand::Draw { mode, first, count } => {
            serde_json::json!({"op": "draw", "mode": format!("{mode:?}"), "first": first, "count": count})
        }
    }
}

fn command_line(command: &GlCommand) -> String {
    match command {
        GlCommand::Viewport {
            x,
            y,
            width,
            height,
        } => format!("viewport {x} {y} {width} {height}"),
        GlCommand::Clear { color } => format!("clear {color:?}"),
        GlCommand::UseProgram(program) => format!("use_program {program:?}"),
        GlCommand::Uniform2f { x, y, .. } => format!("uniform2f {x} {y}"),
        GlCommand::BufferData {
            buffer,
            data,
            usage,
        } => format!("buffer_data {buffer:?} {usage:?} {data:?}"),
        GlCommand::Draw { mode, first, count } => format!("draw {mode:?} first={first} count={count}"),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Render {
            width,
            height,
            output,
        } => {
            let surface = SurfaceSize::new(width, height)?;
            let gl = SoftwareBackend::new(surface);
            let stats = render_once(&gl, surface, &SceneData::reference())?;
            write_png(&gl.framebuffer(), &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "width": width,
                    "height": height,
                    "drawn": stats.drawn,
                    "skipped": stats.skipped,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} shapes ({width}x{height}, {} skipped) -> {}",
                    stats.drawn,
                    stats.skipped,
                    output.display()
                );
            }
        }
        Command::Draws { width, height } => {
            let surface = SurfaceSize::new(width, height)?;
            let gl = SoftwareBackend::new(surface);
            let stats = render_once(&gl, surface, &SceneData::reference())?;
            let commands = gl.take_commands();

            if cli.json {
                let info = serde_json::json!({
                    "drawn": stats.drawn,
                    "skipped": stats.skipped,
                    "commands": commands.iter().map(command_json).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for command in &commands {
                    println!("{}", command_line(command));
                }
            }
        }
        Command::Scene => {
            let scene = SceneData::reference();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&scene)?);
            } else {
                println!("Backgrounds:");
                for band in &scene.backgrounds {
                    let [tl, _, _, br] = band.corners;
                    let colors: Vec<String> = band.colors.iter().map(|c| c.to_hex()).collect();
                    println!("  ({}, {}) - ({}, {})  {}", tl.x, tl.y, br.x, br.y, colors.join(" "));
                }
                println!("Points:");
                for point in &scene.points {
                    println!(
                        "  ({}, {})  size {}  {}",
                        point.center.x,
                        point.center.y,
                        point.size,
                        point.color.to_hex()
                    );
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_defaults_match_reference_surface() {
        let cli = Cli::try_parse_from(["bandplot", "render"]).unwrap();
        match cli.command {
            Command::Render {
                width,
                height,
                output,
            } => {
                assert_eq!((width, height), (800, 600));
                assert_eq!(output, PathBuf::from("bandplot.png"));
            }
            _ => panic!("expected render"),
        }
        assert!(!cli.json);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bandplot", "draws", "--json", "--log-level", "debug"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn zero_width_is_input_error() {
        let cli = Cli::try_parse_from(["bandplot", "draws", "-W", "0"]).unwrap();
        let err = run(cli).err().unwrap();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn oversized_surface_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let cli = Cli::try_parse_from([
            "bandplot",
            "render",
            "-W",
            "2000000000",
            "-H",
            "1",
            "-o",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let err = run(cli).err().unwrap();
        assert_eq!(err.exit_code(), 12);
        assert!(!path.exists());
    }

    #[test]
    fn render_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let cli = Cli::try_parse_from([
            "bandplot",
            "render",
            "-W",
            "40",
            "-H",
            "30",
            "-o",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(cli).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn command_json_tags_draws() {
        let value = command_json(&GlCommand::Draw {
            mode: bandplot_core::pipeline::DrawMode::TriangleStrip,
            first: 0,
            count: 4,
        });
        assert_eq!(value["op"], "draw");
        assert_eq!(value["count"], 4);
        assert_eq!(value["mode"], "TriangleStrip");
    }
}
