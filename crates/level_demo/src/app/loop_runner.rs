use std::path::Path;
use std::process::ExitCode;

use scripting::{
    puts, resolve_script_paths, ConsoleOutput, GiantJewelBox, JewelColor, Level, LevelObject,
    Point, Rect, SpawnPolicy, Uid,
};
use tracing::{error, info, warn};

use super::bootstrap::DemoConfig;
use super::jewel_field::{JewelField, LoggedAudio};

const FLOOR_Y: f32 = 480.0;
const MAX_SETTLE_STEPS: usize = 600;
const BOX_SIZE: f32 = 43.0;

type DemoLevel = Level<LoggedAudio, JewelField>;
type DemoResult<T> = Result<T, String>;

struct BoxSpec {
    uid: Uid,
    kind: &'static str,
    position: Point,
    jewels: u32,
}

const DEMO_BOXES: [BoxSpec; 2] = [
    BoxSpec {
        uid: Uid(14),
        kind: "box",
        position: Point { x: 320.0, y: 437.0 },
        jewels: 10,
    },
    BoxSpec {
        uid: Uid(15),
        kind: "box",
        position: Point { x: 640.0, y: 437.0 },
        jewels: 6,
    },
];

pub(crate) fn run(config: DemoConfig) -> ExitCode {
    match run_sessions(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "level_demo_failed");
            ExitCode::FAILURE
        }
    }
}

fn run_sessions(config: &DemoConfig) -> DemoResult<()> {
    let paths = resolve_script_paths().map_err(|error| format!("resolve paths: {error}"))?;
    let save_path = paths.save_file(&config.level_name);
    let mut console = ConsoleOutput::new();

    play_session(config, &save_path, &mut console)?;
    restore_session(config, &save_path, &mut console)?;

    let mut lines = Vec::new();
    console.drain_lines_into(&mut lines);
    for line in lines {
        info!(source = "script", "{line}");
    }
    Ok(())
}

fn build_level(config: &DemoConfig) -> DemoResult<(DemoLevel, Vec<GiantJewelBox>)> {
    let mut level = Level::new(
        config.level_name.clone(),
        LoggedAudio::default(),
        JewelField::new(FLOOR_Y),
    );

    let mut boxes = Vec::with_capacity(DEMO_BOXES.len());
    for spec in &DEMO_BOXES {
        let handle = level
            .insert_object(LevelObject::new(
                spec.uid,
                spec.kind,
                Rect {
                    x: spec.position.x,
                    y: spec.position.y,
                    width: BOX_SIZE,
                    height: BOX_SIZE,
                },
            ))
            .map_err(|error| format!("insert box {}: {error}", spec.uid))?;

        let policy = match config.seed {
            Some(seed) => SpawnPolicy::seeded(seed.wrapping_add(spec.uid.0)),
            None => SpawnPolicy::from_entropy(),
        };
        let mut jewel_box = GiantJewelBox::with_policy(handle, spec.jewels, &level, policy)
            .map_err(|error| format!("create jewel box {}: {error}", spec.uid))?;
        jewel_box.attach(&mut level);
        boxes.push(jewel_box);
    }
    Ok((level, boxes))
}

fn play_session(
    config: &DemoConfig,
    save_path: &Path,
    console: &mut ConsoleOutput,
) -> DemoResult<()> {
    let (mut level, boxes) = build_level(config)?;

    for uid in &config.activate {
        // Activate twice: the second press must not throw more jewels.
        for _ in 0..2 {
            if let Err(error) = level.activate(*uid) {
                warn!(error = %error, "activation_skipped");
                break;
            }
        }
    }

    let mut steps = 0;
    while !level.items().all_resting() && steps < MAX_SETTLE_STEPS {
        level.items_mut().step();
        steps += 1;
    }

    let field = level.items();
    puts(
        console,
        &[&format!(
            "session 1: {} jewels ({} yellow, {} red) settled after {steps} steps, {} cues",
            field.jewels().len(),
            field.count_color(JewelColor::Yellow),
            field.count_color(JewelColor::Red),
            level.audio().played(),
        )],
    );
    report_boxes(console, &boxes);

    let save = level
        .save_to_path(save_path)
        .map_err(|error| format!("save level: {error}"))?;
    let store_json =
        serde_json::to_string(&save.store).map_err(|error| format!("encode store: {error}"))?;
    puts(console, &[&format!("saved store: {store_json}")]);
    Ok(())
}

fn restore_session(
    config: &DemoConfig,
    save_path: &Path,
    console: &mut ConsoleOutput,
) -> DemoResult<()> {
    let (mut level, boxes) = build_level(config)?;
    let restored = level
        .load_from_path(save_path)
        .map_err(|error| format!("load level: {error}"))?;
    puts(console, &[&format!("session 2: restored from save = {restored}")]);
    report_boxes(console, &boxes);

    for jewel_box in &boxes {
        let uid = jewel_box.target().uid();
        level
            .activate(uid)
            .map_err(|error| format!("activate box {uid}: {error}"))?;
    }
    level.items_mut().step();
    puts(
        console,
        &[&format!(
            "session 2: activating every box threw {} jewels",
            level.items().jewels().len()
        )],
    );
    Ok(())
}

fn report_boxes(console: &mut ConsoleOutput, boxes: &[GiantJewelBox]) {
    for jewel_box in boxes {
        puts(
            console,
            &[&format!(
                "  box {} ({} jewels): activated = {}",
                jewel_box.target().uid(),
                jewel_box.count(),
                jewel_box.is_activated()
            )],
        );
    }
}
