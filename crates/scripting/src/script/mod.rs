mod jewel_box;
mod manifest;
mod print;
mod spawn;

pub use jewel_box::{GiantJewelBox, TargetRef, JEWEL_SOUND, SAVE_KIND, SAVE_NAMESPACE};
pub use manifest::{Point, Rect, TypeAliasError, TypeAliases};
pub use print::{p, print, printf, puts, ConsoleOutput, PrintSink, MAX_OUTPUT_LINES};
pub use spawn::{JewelColor, SpawnDescriptor, SpawnPolicy, SPAWN_VERTICAL_OFFSET};
