//! Mini Arcade entry point
//!
//! On the web the page drives `platform::web::WebArcade`. Natively this runs
//! the scripted autoplayer through the session host and prints the results.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;

    use mini_arcade::autoplay::play_round;
    use mini_arcade::consts::MAX_LEVEL;
    use mini_arcade::sim::GameKind;
    use mini_arcade::{HostError, ProgressStore, RulesetPreset, SessionHost, Settings, platform};

    const USAGE: &str = "usage: mini-arcade <trace|catch|color|shapes|basket|all> [level] [seed] [--classic]";
    const SETTINGS_FILE: &str = "mini_arcade_settings.json";
    /// Generous cap; the longest round (catching) needs about 1900 frames
    const MAX_FRAMES: u32 = 10_000;

    struct Args {
        games: Vec<GameKind>,
        level: u8,
        seed: Option<u64>,
        classic: bool,
    }

    fn parse_args(raw: &[String]) -> Result<Args, String> {
        let classic = raw.iter().any(|a| a == "--classic");
        let mut positional = raw.iter().filter(|a| !a.starts_with("--"));

        let games = match positional.next().map(String::as_str) {
            None => return Err(USAGE.to_string()),
            Some("all") => GameKind::ALL.to_vec(),
            Some(id) => vec![GameKind::from_str(id).ok_or_else(|| HostError::UnknownGame(id.to_string()).to_string())?],
        };
        let level = match positional.next() {
            Some(s) => s
                .parse::<u8>()
                .map_err(|_| format!("bad level '{s}'\n{USAGE}"))?,
            None => 1,
        };
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(HostError::LevelOutOfRange(level).to_string());
        }
        let seed = positional
            .next()
            .map(|s| s.parse::<u64>().map_err(|_| format!("bad seed '{s}'\n{USAGE}")))
            .transpose()?;

        Ok(Args {
            games,
            level,
            seed,
            classic,
        })
    }

    pub fn main() {
        platform::init_logging();

        let raw: Vec<String> = std::env::args().skip(1).collect();
        let args = match parse_args(&raw) {
            Ok(args) => args,
            Err(msg) => {
                eprintln!("{msg}");
                std::process::exit(2);
            }
        };

        let mut settings = Settings::load_from(Path::new(SETTINGS_FILE));
        if args.classic {
            settings.preset = RulesetPreset::Classic;
            settings.custom_rules = None;
        }
        if args.seed.is_some() {
            settings.seed = args.seed;
        }
        log::info!("Mini Arcade (native) with {} rules", settings.preset.as_str());

        let progress = ProgressStore::load(platform::default_progress_backend());
        let seed = args.seed.unwrap_or(0x5EED);
        let mut host = SessionHost::new(progress, &settings, seed);

        for kind in args.games {
            // Play up through the requested level so it is unlocked
            for level in 1..=args.level {
                host.select_game(kind);
                if let Err(e) = host.select_level(level).and_then(|_| host.start_playing()) {
                    eprintln!("{kind} level {level}: {e}");
                    break;
                }
                match play_round(&mut host, MAX_FRAMES) {
                    Some(score) => println!("{:<16} level {level}: {score:>5} pts", kind.title()),
                    None => println!("{:<16} level {level}: did not finish", kind.title()),
                }
            }
            println!(
                "{:<16} unlocked up to level {}",
                kind.title(),
                host.progress().highest_unlocked_level(kind)
            );
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(s: &str) -> Vec<String> {
            s.split_whitespace().map(String::from).collect()
        }

        #[test]
        fn test_parse_args() {
            let parsed = parse_args(&args("catch 3 42 --classic")).unwrap();
            assert_eq!(parsed.games, vec![GameKind::Catch]);
            assert_eq!(parsed.level, 3);
            assert_eq!(parsed.seed, Some(42));
            assert!(parsed.classic);

            let parsed = parse_args(&args("all")).unwrap();
            assert_eq!(parsed.games.len(), 5);
            assert_eq!(parsed.level, 1);
            assert_eq!(parsed.seed, None);
        }

        #[test]
        fn test_parse_args_rejects_bad_input() {
            assert!(parse_args(&[]).is_err());
            assert!(parse_args(&args("pong")).is_err());
            assert!(parse_args(&args("trace 5")).is_err());
            assert!(parse_args(&args("trace x")).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
