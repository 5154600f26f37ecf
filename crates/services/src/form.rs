//! Creation dialog state: whether it is open and what has been typed.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm<D> {
    open: bool,
    draft: D,
}

impl<D: Default> DraftForm<D> {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Clears the fields and closes the dialog.
    pub fn reset(&mut self) {
        self.draft = D::default();
        self.open = false;
    }
}
