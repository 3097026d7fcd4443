use crate::error::PageError;
use crate::example::{Example, Session};
use tokio::task::JoinHandle;

/// The bits of a submit event the handler cares about.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the page from navigating away.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Connects a form's submit to one example whose route takes a search term.
///
/// The term is read from the input and handed straight to the request;
/// nothing is kept between submissions.
pub struct FormBridge {
    session: Session,
    example: Example,
    form: &'static str,
    input: &'static str,
}

impl FormBridge {
    pub fn new(session: Session, example: Example) -> Self {
        Self {
            session,
            example,
            form: "form",
            input: "input",
        }
    }

    /// Handles one submit: prevent navigation, capture the trimmed input,
    /// start the request, clear the input.
    ///
    /// Returns as soon as the request is scheduled. The handle can be
    /// awaited, but the page never does.
    pub fn submit(&self, event: &mut SubmitEvent) -> Result<JoinHandle<()>, PageError> {
        event.prevent_default();

        let (input, term) = {
            let doc = self.session.doc.borrow();
            doc.query_selector(self.form)
                .ok_or_else(|| PageError::MissingElement(self.form.to_string()))?;
            let input = doc
                .query_selector(self.input)
                .ok_or_else(|| PageError::MissingElement(self.input.to_string()))?;
            (input, doc.value(input).trim().to_string())
        };
        log::debug!("form submitted with '{term}'");

        let handle = self.example.start(&self.session, Some(term.as_str()))?;
        self.session.doc.borrow_mut().set_value(input, "");
        Ok(handle)
    }

    /// Types `text` into the input and submits, the way a user would.
    pub fn type_and_submit(&self, text: &str) -> Result<JoinHandle<()>, PageError> {
        {
            let mut doc = self.session.doc.borrow_mut();
            let input = doc
                .query_selector(self.input)
                .ok_or_else(|| PageError::MissingElement(self.input.to_string()))?;
            doc.set_value(input, text);
        }
        self.submit(&mut SubmitEvent::new())
    }
}
