//! Small pictures drawn in characters

use alloc::format;
use alloc::string::String;

use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::context::Context;

/// Named pictures, four rows each
///
/// The HD44780 ROM puts a yen sign where ASCII has a backslash, so
/// backslashes are swapped for a backtick when drawn.
pub static ARTS: [(&str, [&str; 4]); 15] = [
    (
        "cat",
        [
            r"       /\_/\        ",
            r"      ( o.o )       ",
            r"       > ^ <        ",
            r"      /|   |\       ",
        ],
    ),
    (
        "heart",
        [
            r"     **     **     ",
            r"    *  *   *  *    ",
            r"    *    *    *    ",
            r"     *       *     ",
        ],
    ),
    (
        "robot",
        [
            r"     .-------.     ",
            r"    | o     o |    ",
            r"    |    ^    |    ",
            r"    | '-----' |    ",
        ],
    ),
    (
        "coffee",
        [
            r"         )(         ",
            r"        (  )        ",
            r"       .----.       ",
            r"       |____|       ",
        ],
    ),
    (
        "house",
        [
            r"         /\         ",
            r"        /  \        ",
            r"       /____\       ",
            r"       | [] |       ",
        ],
    ),
    (
        "tree",
        [
            r"         *         ",
            r"        ***        ",
            r"       *****       ",
            r"         |         ",
        ],
    ),
    (
        "rocket",
        [
            r"         /\        ",
            r"        /  \       ",
            r"       | () |      ",
            r"       |    |      ",
        ],
    ),
    (
        "flower",
        [
            r"       @-@-@        ",
            r"        \|/         ",
            r"         |          ",
            r"         |          ",
        ],
    ),
    (
        "bird",
        [
            r"        ___         ",
            r"       ( v )        ",
            r"      ((___))       ",
            r"        ^ ^         ",
        ],
    ),
    (
        "snowman",
        [
            r"       _===_       ",
            r"      ( o.o )      ",
            r"      ( > < )      ",
            r"     _( === )_     ",
        ],
    ),
    (
        "santahat",
        [
            r"         *        ",
            r"        / \       ",
            r"       /   \      ",
            r"      {_____}     ",
        ],
    ),
    (
        "snowflake",
        [
            r"       \ | /       ",
            r"      --***--      ",
            r"      --***--      ",
            r"       / | \       ",
        ],
    ),
    (
        "lights",
        [
            r"     o-o-o-o-o      ",
            r"    *~*~*~*~*~*     ",
            r"   o-o-o-o-o-o-o    ",
            r"    *~*~*~*~*~*     ",
        ],
    ),
    (
        "gingerbread",
        [
            r"         o         ",
            r"        \|/        ",
            r"         |         ",
            r"        / \        ",
        ],
    ),
    (
        "bethlehem",
        [
            r"         *         ",
            r"        /|\        ",
            r"       / | \       ",
            r"      /  |  \      ",
        ],
    ),
];

#[derive(Debug, Default)]
pub struct AsciiMode;

impl AsciiMode {
    pub fn new() -> Self {
        Self
    }
}

fn find(name: &str) -> Option<&'static [&'static str; 4]> {
    ARTS.iter()
        .find(|(art_name, _)| *art_name == name)
        .map(|(_, rows)| rows)
}

/// Art chosen from the wall clock, one step per second
fn random_art(now_ms: u64) -> &'static [&'static str; 4] {
    &ARTS[(now_ms / 1000) as usize % ARTS.len()].1
}

fn to_lcd(rows: &[&str; 4]) -> String {
    rows.join("\n").replace('\\', "`")
}

impl Mode for AsciiMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Ascii
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        let art = match params.text() {
            Some(name) => match find(name) {
                Some(art) => {
                    ctx.logger.trace(&format!("Displaying ASCII art: {}", name));
                    art
                }
                None => {
                    ctx.log(&format!(
                        "Invalid ASCII art name: {}. Using random art.",
                        name
                    ));
                    random_art(ctx.now_ms())
                }
            },
            None => random_art(ctx.now_ms()),
        };

        ctx.show(&to_lcd(art), false)?;
        Ok(Rendered::Drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Rig;

    #[test]
    fn test_named_art() {
        let mut rig = Rig::new();
        let params = ModeParams::Text("cat".into());
        AsciiMode::new().render(&mut rig.ctx(), &params).unwrap();

        let frame = rig.display.frame();
        assert_eq!(frame[0], "       /`_/`        ");
        assert_eq!(frame[3], "      /|   |`       ");
        assert!(rig.logger.lines.is_empty());
    }

    #[test]
    fn test_unknown_name_falls_back_to_random() {
        let mut rig = Rig::new();
        rig.clock.now = 3_000;
        let params = ModeParams::Text("dragon".into());
        AsciiMode::new().render(&mut rig.ctx(), &params).unwrap();

        assert_eq!(
            rig.logger.lines,
            vec!["Invalid ASCII art name: dragon. Using random art."]
        );
        // Second 3 of the epoch picks the fourth art
        assert_eq!(rig.display.trimmed()[2], "       .----.");
    }

    #[test]
    fn test_random_art_is_clock_driven() {
        assert_eq!(random_art(0), &ARTS[0].1);
        assert_eq!(random_art(15_999), &ARTS[0].1);
        assert_eq!(random_art(16_000), &ARTS[1].1);
    }

    #[test]
    fn test_arts_fit_a_twenty_column_panel() {
        for (name, rows) in ARTS.iter() {
            for row in rows {
                assert!(row.chars().count() <= 20, "{} is too wide", name);
            }
        }
    }
}
