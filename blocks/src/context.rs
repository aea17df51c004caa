use tideline_core::form::{FormKind, FormSlots, FormState};
use tideline_core::media::MediaResolver;

/// What renderers need beyond the content itself.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub media: MediaResolver,
    /// Submission state of the forms on this page.
    pub forms: FormSlots,
}

impl RenderContext {
    pub fn new(media: MediaResolver) -> Self {
        Self {
            media,
            forms: FormSlots::default(),
        }
    }

    pub fn with_forms(mut self, forms: FormSlots) -> Self {
        self.forms = forms;
        self
    }

    pub fn form(&self, kind: FormKind) -> &FormState {
        self.forms.get(kind)
    }
}
