//! Canned phrases: holiday greetings and movie quotes

use super::{pick_index, Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::context::Context;

pub static GREETINGS: [&str; 22] = [
    "Feliz Natal!\n\nQue esta época traga muita alegria!",
    "Boas Festas!\n\nDesejo um Natal cheio de amor e paz",
    "Feliz Natal e um Próspero Ano Novo!\nCom os melhores votos de felicidade!",
    "Neste Natal, que a magia ilumine o teu coração!",
    "Que o espírito natalício traga muita felicidade a toda a família!",
    "Feliz Natal!\n\nQue 2026 seja um ano incrível!",
    "Boas Festas!\n\nQue o Ano Novo traga realizações!",
    "Feliz Natal!\n\nQue esta época traga alegria!",
    "Boas Festas!\n\nDesejo um Natal cheio de paz!",
    "Feliz Natal e um Próspero Ano Novo!",
    "Que a magia do Natal ilumine o teu dia!",
    "Que o espírito natalício traga felicidade!",
    "Feliz Natal!\n\nQue 2026 seja incrível!",
    "Boas Festas!\n\nQue o Ano Novo traga sucesso!",
    "Feliz Natal!\n\nMuita saúde e alegria!",
    "Que o Natal traga bons momentos!",
    "Boas Festas!\n\nMuito amor nesta época!",
    "Um Natal iluminado e feliz!",
    "Feliz Natal!\n\nQue os sonhos se realizem!",
    "Que este Natal seja simples e feliz!",
    "Feliz Natal e um Ano Novo feliz!",
    "Boas Festas!\n\nDias cheios de alegria!",
];

pub static QUOTES: [&str; 40] = [
    "May the Force be with you.\n\nStar Wars",
    "I'll be back.\n\nThe Terminator",
    "There's no place like home.\nThe Wizard of Oz",
    "Houston, we have a problem.\n\nApollo 13",
    "You can't handle the truth!\n\nA Few Good Men",
    "I'm the king of the world!\n\nTitanic",
    "Just keep swimming.\n\nDory",
    "To infinity and beyond!\n\nToy Story",
    "Life is like a box of chocolates.\n\nForrest Gump",
    "Carpe diem. Seize the day, boys.\n\nDead Poets Society",
    "Sometimes you have to take a leap.\nDead Poets Society",
    "Every man dies, not every man really lives.\nBraveheart",
    "I'm gonna make him an offer he can't refuse.\nThe Godfather",
    "After all, tomorrow is another day!\n\nGone with the Wind",
    "Roads? Where we're going, we don't need roads.\nBack to the Future",
    "The future is what you make it, so make it a good one.\nBack to the Future",
    "I feel the need, the need for speed!\n\nTop Gun",
    "Hasta la vista, baby.\n\nTerminator 2",
    "Hope is a good thing, maybe the best of things.\nShawshank",
    "Fear is the mind-killer; let it pass through you.\nDune",
    "Not all treasure is silver and gold, mate.\nJack Sparrow",
    "Run, Forrest, run!\n\nForrest Gump",
    "You make your own luck.\n\nThe Martian",
    "Happiness is only real when shared.\n\nInto the Wild",
    "Never give up hope.\n\nThe Green Mile",
    "Let the past die.\n\nStar Wars",
    "Be a goldfish, Sam.\n\nTed Lasso",
    "Human beings are never perfect.\n\nTed Lasso",
    "Get busy living, or get busy dying.\nShawshank",
    "There's no place like home.\n\nThe Wizard of Oz",
    "It is our choices, Harry, that show what we truly are.\nDumbledore",
    "Yer a wizard, Harry.\n\nHagrid",
    "We've all got something worth fighting for.\nHermione",
    "Look after your kingdom.\n\nMufasa",
    "Life's not fair, but it's still good.\nMufasa",
    "Simba, you are ready.\n\nNala",
    "Hakuna Matata.\n\nTimon & Pumba",
    "Look beyond what you see.\n\nMufasa",
    "Courage comes from within.\n\nSimba",
    "Ogres are like onions.\n\nShrek",
];

/// Shows one phrase from a fixed list, word-wrapped
#[derive(Debug)]
pub struct PhraseMode {
    kind: ModeKind,
    phrases: &'static [&'static str],
}

impl PhraseMode {
    pub fn greetings() -> Self {
        Self {
            kind: ModeKind::Greetings,
            phrases: &GREETINGS,
        }
    }

    pub fn quotes() -> Self {
        Self {
            kind: ModeKind::Quotes,
            phrases: &QUOTES,
        }
    }

    /// Phrase shown at `now_ms`
    pub fn phrase_at(&self, now_ms: u64) -> &'static str {
        self.phrases[pick_index(now_ms, self.phrases.len())]
    }
}

impl Mode for PhraseMode {
    fn kind(&self) -> ModeKind {
        self.kind
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        _params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        let phrase = self.phrase_at(ctx.now_ms());
        ctx.show(phrase, true)?;
        Ok(Rendered::Drawn)
    }
}
