//! Treasure Hunt headless runner
//!
//! Drives the simulation without a window: the autopilot holds the movement
//! keys, events are logged, and the final frame can be dumped as JSON for a
//! renderer or for inspection.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::process::ExitCode;

    use treasure_hunt::consts::TICK_RATE;
    use treasure_hunt::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use treasure_hunt::{Frame, GameConfig};

    /// Consecutive failed generations before giving up on a run
    const MAX_GENERATION_RETRIES: u32 = 3;

    #[derive(Debug, Clone)]
    struct Args {
        seed: u64,
        ticks: u64,
        config: Option<String>,
        dump_frame: bool,
    }

    impl Args {
        fn usage() -> &'static str {
            "usage: treasure-hunt [--seed N] [--ticks N] [--config PATH] [--frame]"
        }

        fn parse() -> Result<Self, String> {
            let mut args = Args {
                seed: 1,
                ticks: 60 * TICK_RATE as u64,
                config: None,
                dump_frame: false,
            };

            let mut it = std::env::args().skip(1);
            while let Some(arg) = it.next() {
                match arg.as_str() {
                    "--seed" => args.seed = parse_number(&arg, it.next())?,
                    "--ticks" => args.ticks = parse_number(&arg, it.next())?,
                    "--config" => {
                        args.config = Some(it.next().ok_or("--config needs a path")?);
                    }
                    "--frame" => args.dump_frame = true,
                    "-h" | "--help" => return Err(Self::usage().to_string()),
                    other => return Err(format!("unknown argument: {other}")),
                }
            }
            Ok(args)
        }
    }

    fn parse_number(flag: &str, value: Option<String>) -> Result<u64, String> {
        let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
        value
            .parse()
            .map_err(|e| format!("bad value for {flag}: {value} ({e})"))
    }

    pub fn run() -> ExitCode {
        env_logger::init();

        let args = match Args::parse() {
            Ok(args) => args,
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("{}", Args::usage());
                return ExitCode::from(2);
            }
        };

        let config = match &args.config {
            Some(path) => match GameConfig::load(path) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("{e}");
                    return ExitCode::FAILURE;
                }
            },
            None => GameConfig::default(),
        };

        log::info!("Treasure Hunt starting with seed {}", args.seed);
        let mut state = GameState::new(config, args.seed);

        let mut failures = 0;
        for elapsed in 0.. {
            // Out of ticks acts as the player pressing quit
            let input = TickInput {
                idle_mode: true,
                quit: elapsed >= args.ticks,
                ..Default::default()
            };
            if input.quit {
                log::info!("Quit after {elapsed} ticks");
                break;
            }

            if let Err(e) = tick(&mut state, &input) {
                failures += 1;
                log::warn!("Level {} generation failed ({failures}): {e}", state.level);
                if failures >= MAX_GENERATION_RETRIES {
                    log::error!("Giving up on level {}", state.level);
                    return ExitCode::FAILURE;
                }
                continue;
            }
            failures = 0;

            for event in state.drain_events() {
                match event {
                    GameEvent::CoinCollected { score, .. } => log::debug!("Coin! score={score}"),
                    other => log::info!("{other:?}"),
                }
            }

            if state.phase.is_terminal() {
                break;
            }
        }

        let frame = Frame::capture(&state);
        let status = match state.phase {
            GamePhase::Caught => "Game Over!",
            GamePhase::Victory => "Victory! You passed all levels.",
            GamePhase::Generating | GamePhase::Playing => "Out of time",
        };
        println!(
            "{status} {} after {} ticks",
            frame.hud_text(),
            state.time_ticks
        );

        if args.dump_frame {
            match serde_json::to_string_pretty(&frame) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    log::error!("Failed to serialize frame: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }

        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner in the browser
}
