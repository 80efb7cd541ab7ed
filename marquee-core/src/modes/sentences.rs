//! Sentences from the sentence service

use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::context::Context;

#[derive(Debug, Default)]
pub struct SentencesMode;

impl SentencesMode {
    pub fn new() -> Self {
        Self
    }
}

impl Mode for SentencesMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Sentences
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        _params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        let sentence = ctx.sentences.sentence()?;
        ctx.show(&sentence, true)?;
        Ok(Rendered::Drawn)
    }
}
