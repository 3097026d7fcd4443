//! The declarative unit of a page: where to fetch from, where to render,
//! how to pick fields, and how the outcome is consumed.

use crate::config::ApiConfig;
use crate::dom::Document;
use crate::endpoint::Route;
use crate::error::{FetchError, PageError};
use crate::notify::Notifier;
use crate::render::{render_groups, Extractor};
use crate::request::{PendingRequest, RequestRenderer};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    Remote(Route),
    /// A literal body that is decoded instead of fetched.
    Inline(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// `.then(..).catch(..)` continuations.
    Callback,
    /// `await` inside a spawned task with a local `match`.
    Await,
}

#[derive(Clone, Copy)]
pub struct Example {
    pub label: &'static str,
    pub container: &'static str,
    pub source: Source,
    pub extract: Extractor,
    pub style: Style,
    /// Shown to the user on failure, in addition to the log line.
    pub alert: Option<&'static str>,
}

impl fmt::Debug for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Example")
            .field("label", &self.label)
            .field("container", &self.container)
            .field("source", &self.source)
            .field("style", &self.style)
            .field("alert", &self.alert)
            .finish_non_exhaustive()
    }
}

/// Everything a running example touches. Cheap to clone; all clones share
/// the same document.
#[derive(Clone)]
pub struct Session {
    pub doc: Rc<RefCell<Document>>,
    pub renderer: RequestRenderer,
    pub api: Rc<ApiConfig>,
    pub notifier: Rc<dyn Notifier>,
}

impl Session {
    pub fn new(doc: Document, api: ApiConfig, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            doc: Rc::new(RefCell::new(doc)),
            renderer: RequestRenderer::new(),
            api: Rc::new(api),
            notifier,
        }
    }

    pub fn with_renderer(mut self, renderer: RequestRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn html(&self) -> String {
        self.doc.borrow().to_html()
    }
}

impl Example {
    /// Builds the request synchronously and schedules it on the current
    /// `LocalSet`. The returned handle completes after the continuation ran.
    ///
    /// `term` fills the route's search parameter, if it has one.
    pub fn start(&self, session: &Session, term: Option<&str>) -> Result<JoinHandle<()>, PageError> {
        let pending = match self.source {
            Source::Remote(route) => {
                let endpoint = route.resolve(&session.api, term)?;
                log::info!("{}: requesting {endpoint}", self.label);
                session.renderer.get(endpoint)
            }
            Source::Inline(text) => {
                PendingRequest::settled(serde_json::from_str(text).map_err(FetchError::from))
            }
        };

        let example = *self;
        let handle = match self.style {
            Style::Callback => {
                let ok_session = session.clone();
                let err_session = session.clone();
                pending
                    .then(move |body| example.on_success(&ok_session, body))
                    .catch(move |err| example.on_failure(&err_session, err))
            }
            Style::Await => {
                let session = session.clone();
                tokio::task::spawn_local(async move {
                    match pending.await {
                        Ok(body) => example.on_success(&session, body),
                        Err(err) => example.on_failure(&session, err),
                    }
                })
            }
        };
        Ok(handle)
    }

    fn on_success(&self, session: &Session, body: Value) {
        log::info!("{} was successful", self.label);
        log::debug!("{} body: {body}", self.label);

        let groups = (self.extract)(&body);
        let rendered = render_groups(&mut session.doc.borrow_mut(), self.container, &groups);
        match rendered {
            Ok(nodes) => log::debug!("{}: appended {} element(s)", self.label, nodes.len()),
            Err(err) => log::error!("{}: {err}", self.label),
        }
    }

    fn on_failure(&self, session: &Session, err: FetchError) {
        session.notifier.failure(self.label, &err);
        if let Some(message) = self.alert {
            session.notifier.alert(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Api;
    use crate::notify::{Notice, RecordingNotifier};
    use crate::render::{field_text, NodeSpec};
    use serde_json::json;
    use tokio::task::LocalSet;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn name_heading(body: &Value) -> Vec<crate::render::Group> {
        vec![vec![NodeSpec::text("h3", field_text(body, "name"))]]
    }

    fn example(style: Style, alert: Option<&'static str>) -> Example {
        Example {
            label: "Test example",
            container: "#first",
            source: Source::Remote(Route::fixed(Api::Swapi, "api/people/1/")),
            extract: name_heading,
            style,
            alert,
        }
    }

    fn make_session(base: &str) -> (Session, Rc<RecordingNotifier>) {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append_with_id(body, "div", "first");
        let notifier = Rc::new(RecordingNotifier::new());
        let api = ApiConfig::all_at(base).unwrap();
        (Session::new(doc, api, notifier.clone()), notifier)
    }

    fn first_texts(session: &Session) -> Vec<String> {
        let doc = session.doc.borrow();
        let first = doc.query_selector("#first").unwrap();
        doc.children(first)
            .iter()
            .map(|c| doc.text(*c).to_string())
            .collect()
    }

    async fn mount_luke(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/people/1/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "Luke Skywalker"})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_both_styles_render_the_same() {
        let server = MockServer::start().await;
        mount_luke(&server).await;

        for style in [Style::Callback, Style::Await] {
            let (session, notifier) = make_session(&server.uri());
            let ex = example(style, None);
            LocalSet::new()
                .run_until(async {
                    ex.start(&session, None).unwrap().await.unwrap();
                })
                .await;

            assert_eq!(first_texts(&session), vec!["Luke Skywalker"]);
            assert_eq!(notifier.failure_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_touch_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        for style in [Style::Callback, Style::Await] {
            let (session, notifier) = make_session(&server.uri());
            let ex = example(style, Some("Try again"));
            LocalSet::new()
                .run_until(async {
                    ex.start(&session, None).unwrap().await.unwrap();
                })
                .await;

            assert!(first_texts(&session).is_empty());
            assert_eq!(notifier.failure_count(), 1);
            assert_eq!(notifier.alert_count(), 1);
        }
    }

    #[tokio::test]
    async fn test_network_failure_reports_once() {
        let (session, notifier) = make_session("http://127.0.0.1:9");
        let ex = example(Style::Callback, Some("Try again"));

        LocalSet::new()
            .run_until(async {
                ex.start(&session, None).unwrap().await.unwrap();
            })
            .await;

        assert!(first_texts(&session).is_empty());
        match notifier.notices().as_slice() {
            [Notice::Failure { error: FetchError::Network(_), .. }, Notice::Alert(msg)] => {
                assert_eq!(msg, "Try again")
            }
            other => panic!("unexpected notices {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inline_source_skips_network() {
        let (session, notifier) = make_session("http://127.0.0.1:9");
        let ex = Example {
            source: Source::Inline(r#"{"name": "Because he didn't get arrays."}"#),
            ..example(Style::Await, None)
        };

        LocalSet::new()
            .run_until(async {
                ex.start(&session, None).unwrap().await.unwrap();
            })
            .await;

        assert_eq!(first_texts(&session), vec!["Because he didn't get arrays."]);
        assert_eq!(notifier.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_inline_malformed_takes_failure_path() {
        let (session, notifier) = make_session("http://127.0.0.1:9");
        let ex = Example {
            source: Source::Inline(r#"{"name": "#),
            ..example(Style::Callback, None)
        };

        LocalSet::new()
            .run_until(async {
                ex.start(&session, None).unwrap().await.unwrap();
            })
            .await;

        assert!(first_texts(&session).is_empty());
        match notifier.notices().as_slice() {
            [Notice::Failure { label, error: FetchError::Decode(_) }] => {
                assert_eq!(label, "Test example")
            }
            other => panic!("unexpected notices {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_container_is_logged_not_panicking() {
        let server = MockServer::start().await;
        mount_luke(&server).await;

        let (session, notifier) = make_session(&server.uri());
        let ex = Example {
            container: "#nowhere",
            ..example(Style::Await, None)
        };
        LocalSet::new()
            .run_until(async {
                ex.start(&session, None).unwrap().await.unwrap();
            })
            .await;

        assert!(first_texts(&session).is_empty());
        assert_eq!(notifier.failure_count(), 0);
    }
}
