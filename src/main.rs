use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use log::{info, warn};

use sprite_animator::canvas::RasterCanvas;
use sprite_animator::resources::editorconfig::EditorConfig;
use sprite_animator::session::{Session, SessionError};
use sprite_animator::systems::export::export_summary;

const IO_TIMEOUT: Duration = Duration::from_secs(30);

/// Sprite sheet animator: slice a sheet into frames, define animations and
/// export them as JSON.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Editor configuration file (INI).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long)]
    frame_width: Option<u32>,
    #[arg(long)]
    frame_height: Option<u32>,
    #[arg(long)]
    spacing: Option<u32>,
    #[arg(long)]
    offset_x: Option<u32>,
    #[arg(long)]
    offset_y: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the grid layout of a sheet.
    Grid {
        image: PathBuf,
        /// Also list every frame rectangle.
        #[arg(long)]
        frames: bool,
    },
    /// Render the sheet with its grid overlay to a PNG.
    Preview {
        image: PathBuf,
        #[arg(long, short)]
        out: PathBuf,
        #[command(flatten)]
        anims: AnimArgs,
        /// Highlight the animation with this name.
        #[arg(long)]
        select: Option<String>,
        /// Highlight this frame as hovered.
        #[arg(long)]
        hover: Option<usize>,
    },
    /// Validate animations against a sheet and export them as JSON.
    Export {
        image: PathBuf,
        #[command(flatten)]
        anims: AnimArgs,
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Write to the export path from the config file.
        #[arg(long, conflicts_with = "out")]
        save: bool,
        /// Copy to the system clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// Play one animation into an animated GIF.
    Play {
        image: PathBuf,
        /// The animation to play, as NAME:START:END.
        #[arg(long, value_parser = parse_anim)]
        anim: AnimSpec,
        #[arg(long, short)]
        out: PathBuf,
        /// Preview rate, clamped to 1..=60.
        #[arg(long)]
        fps: Option<i64>,
        /// How many times to run through the animation.
        #[arg(long, default_value_t = 1)]
        loops: usize,
    },
    /// Write the effective configuration to the config file.
    InitConfig,
}

#[derive(Args)]
struct AnimArgs {
    /// Animation as NAME:START:END. Repeatable.
    #[arg(long = "anim", value_parser = parse_anim)]
    anims: Vec<AnimSpec>,
}

#[derive(Debug, Clone)]
struct AnimSpec {
    name: String,
    start: i64,
    end: i64,
}

fn parse_anim(s: &str) -> Result<AnimSpec, String> {
    let mut parts = s.rsplitn(3, ':');
    let (Some(end), Some(start), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected NAME:START:END, got {:?}", s));
    };
    let start = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid start frame {:?}", start))?;
    let end = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid end frame {:?}", end))?;
    Ok(AnimSpec {
        name: name.to_string(),
        start,
        end,
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> EditorConfig {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::with_path(path),
        None => EditorConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(v) = cli.frame_width {
        config.sprite.frame_width = v;
    }
    if let Some(v) = cli.frame_height {
        config.sprite.frame_height = v;
    }
    if let Some(v) = cli.spacing {
        config.sprite.spacing = v;
    }
    if let Some(v) = cli.offset_x {
        config.sprite.offset_x = v;
    }
    if let Some(v) = cli.offset_y {
        config.sprite.offset_y = v;
    }
    config
}

fn open_session(config: EditorConfig, image: PathBuf) -> Result<Session, SessionError> {
    let mut session = Session::new(config)?;
    let layout = session.load_image_blocking(image, IO_TIMEOUT)?;
    if layout.is_empty() {
        warn!("No whole frame fits this sheet with the current configuration");
    }
    Ok(session)
}

fn add_all(session: &mut Session, anims: &[AnimSpec]) -> Result<(), SessionError> {
    for spec in anims {
        session.add_animation(&spec.name, spec.start, spec.end)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), SessionError> {
    let config = load_config(&cli);
    match cli.command {
        Command::Grid { image, frames } => {
            let session = open_session(config, image)?;
            let layout = session.layout();
            println!(
                "{} columns x {} rows = {} frames",
                layout.columns, layout.rows, layout.total_frames
            );
            if frames {
                let sprite = session.sprite_config();
                for index in 0..layout.total_frames {
                    if let Some(r) = session.sheet().frame_rect(index, &sprite) {
                        println!("{:>4}: x={} y={} w={} h={}", index, r.x, r.y, r.width, r.height);
                    }
                }
            }
        }
        Command::Preview {
            image,
            out,
            anims,
            select,
            hover,
        } => {
            let mut session = open_session(config, image)?;
            add_all(&mut session, &anims.anims)?;
            if let Some(name) = select {
                let id = session
                    .registry()
                    .find_by_name(&name)
                    .map(|a| a.id)
                    .ok_or_else(|| SessionError::Io(format!("No animation named {:?}", name)))?;
                session.select(Some(id));
            }
            if let Some(index) = hover {
                if let Some(rect) = session.sheet().frame_rect(index, &session.sprite_config()) {
                    let (cx, cy) = rect.center();
                    session.pointer_moved(cx, cy);
                }
            }
            let mut canvas = RasterCanvas::default();
            session.render_preview(&mut canvas);
            canvas.into_image().save(&out)?;
            info!("Preview written to {}", out.display());
        }
        Command::Export {
            image,
            anims,
            out,
            save,
            copy,
        } => {
            let mut session = open_session(config, image)?;
            add_all(&mut session, &anims.anims)?;
            let json = session.export_json()?;
            eprintln!("{}", export_summary(session.registry(), &json));
            if copy {
                session.copy_export_blocking(IO_TIMEOUT)?;
            }
            if out.is_some() || save {
                session.save_export_blocking(out, IO_TIMEOUT)?;
            } else if !copy {
                println!("{}", json);
            }
            for notice in session.drain_notices() {
                info!("{}", notice.text);
            }
        }
        Command::Play {
            image,
            anim,
            out,
            fps,
            loops,
        } => {
            let mut session = open_session(config, image)?;
            let added = session.add_animation(&anim.name, anim.start, anim.end)?;
            if let Some(fps) = fps {
                session.set_fps(fps);
            }
            session.select(Some(added.id));

            let interval = session.playback().frame_interval_ms();
            let delay = Delay::from_numer_denom_ms(1000, session.playback().fps());
            let mut canvas = RasterCanvas::default();
            let mut frames = Vec::new();
            let count = added.frame_count() * loops.max(1);

            session.toggle_playback();
            for i in 0..count {
                if i > 0 {
                    session.update(interval);
                }
                if session.render_player(&mut canvas).is_some() {
                    frames.push(Frame::from_parts(canvas.image().clone(), 0, 0, delay));
                }
            }
            session.toggle_playback();

            let file = std::fs::File::create(&out)?;
            let mut encoder = GifEncoder::new(file);
            encoder.set_repeat(Repeat::Infinite)?;
            encoder.encode_frames(frames)?;
            info!("Wrote {} frame(s) to {}", count, out.display());
        }
        Command::InitConfig => {
            config.save_to_file()?;
            println!("Config written to {}", config.config_path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_anim_specs() {
        let spec = parse_anim("walk:2:5").unwrap();
        assert_eq!((spec.name.as_str(), spec.start, spec.end), ("walk", 2, 5));

        let spec = parse_anim("ns:idle:0:-1").unwrap();
        assert_eq!((spec.name.as_str(), spec.start, spec.end), ("ns:idle", 0, -1));

        assert!(parse_anim("walk:2").is_err());
        assert!(parse_anim("walk:a:5").is_err());
    }

    #[test]
    fn cli_accepts_repeated_anims() {
        let cli = Cli::try_parse_from([
            "sprite-animator",
            "--frame-width",
            "16",
            "export",
            "sheet.png",
            "--anim",
            "idle:0:3",
            "--anim",
            "run:4:7",
        ])
        .unwrap();
        assert_eq!(cli.frame_width, Some(16));
        match cli.command {
            Command::Export { anims, .. } => assert_eq!(anims.anims.len(), 2),
            _ => panic!("expected export"),
        }
    }
}
