//! The two lesson pages and the examples wired into them.

use crate::dom::Document;
use crate::endpoint::{Api, Route};
use crate::error::PageError;
use crate::example::{Example, Session, Source, Style};
use crate::render::{field_text, records, Group, NodeSpec};
use serde_json::Value;
use tokio::task::JoinHandle;

// =============================================================================
// Field extractors
// =============================================================================

pub fn person_name(body: &Value) -> Vec<Group> {
    vec![vec![NodeSpec::text("h3", field_text(body, "name"))]]
}

pub fn starship_names(body: &Value) -> Vec<Group> {
    records(body, "results")
        .iter()
        .map(|ship| vec![NodeSpec::text("h3", field_text(ship, "name"))])
        .collect()
}

pub fn film_crawls(body: &Value) -> Vec<Group> {
    records(body, "results")
        .iter()
        .map(|movie| {
            vec![
                NodeSpec::text(
                    "h1",
                    format!(
                        "Episode {}: {}",
                        field_text(movie, "episode_id"),
                        field_text(movie, "title")
                    ),
                ),
                NodeSpec::text("p", field_text(movie, "opening_crawl")),
            ]
        })
        .collect()
}

pub fn movie_summary(body: &Value) -> Vec<Group> {
    vec![vec![
        NodeSpec::text("h1", field_text(body, "Title")),
        NodeSpec::text("p", field_text(body, "Plot")),
        NodeSpec::src("img", field_text(body, "Poster")),
    ]]
}

pub fn joke_lines(body: &Value) -> Vec<Group> {
    vec![vec![
        NodeSpec::text("p", field_text(body, "setup")),
        NodeSpec::text("p", field_text(body, "punchline")),
    ]]
}

pub fn quote_lines(body: &Value) -> Vec<Group> {
    vec![vec![
        NodeSpec::text("p", field_text(body, "character")),
        NodeSpec::text("p", field_text(body, "quote")),
    ]]
}

pub fn episode_name(body: &Value) -> Vec<Group> {
    vec![vec![NodeSpec::text("p", field_text(body, "name"))]]
}

// =============================================================================
// Examples
// =============================================================================

pub const SWAPI_PERSON: Example = Example {
    label: "Example 1",
    container: "#first",
    source: Source::Remote(Route::fixed(Api::Swapi, "api/people/1/")),
    extract: person_name,
    style: Style::Callback,
    alert: None,
};

pub const SWAPI_STARSHIPS: Example = Example {
    label: "Example 2",
    container: "#second",
    source: Source::Remote(Route::fixed(Api::Swapi, "api/starships/")),
    extract: starship_names,
    style: Style::Callback,
    alert: None,
};

pub const SWAPI_FILMS: Example = Example {
    label: "Example 3",
    container: "#third",
    source: Source::Remote(Route::fixed(Api::Swapi, "api/films/")),
    extract: film_crawls,
    style: Style::Await,
    alert: None,
};

/// Started by the form, never on load.
pub const OMDB_TITLE: Example = Example {
    label: "Example 4",
    container: "#fourth",
    source: Source::Remote(Route::search(Api::Omdb, "", "t")),
    extract: movie_summary,
    style: Style::Await,
    alert: None,
};

pub const JOKE: &str = r#"{"id":18,"type":"programming","setup":"Why did the programmer quit his job?","punchline":"Because he didn't get arrays."}"#;

pub const INLINE_JOKE: Example = Example {
    label: "Joke",
    container: "#first",
    source: Source::Inline(JOKE),
    extract: joke_lines,
    style: Style::Await,
    alert: None,
};

pub const FRIENDS_QUOTE_CALLBACK: Example = Example {
    label: "Friends quote",
    container: "#second",
    source: Source::Remote(Route::fixed(Api::Friends, "quotes/random")),
    extract: quote_lines,
    style: Style::Callback,
    alert: Some("Try again"),
};

pub const FRIENDS_QUOTE_AWAIT: Example = Example {
    label: "Friends quote (await)",
    container: "#third",
    source: Source::Remote(Route::fixed(Api::Friends, "quotes/random")),
    extract: quote_lines,
    style: Style::Await,
    alert: None,
};

pub const TVMAZE_EPISODE: Example = Example {
    label: "TVmaze episode",
    container: "#fourth",
    source: Source::Remote(Route::with_query(
        Api::Tvmaze,
        "shows/38963/episodebynumber",
        &[("season", "2"), ("number", "8")],
    )),
    extract: episode_name,
    style: Style::Await,
    alert: None,
};

// =============================================================================
// Pages
// =============================================================================

const REVIEW_EXAMPLES: &[Example] = &[SWAPI_PERSON, SWAPI_STARSHIPS, SWAPI_FILMS];
const EXERCISE_EXAMPLES: &[Example] = &[
    INLINE_JOKE,
    FRIENDS_QUOTE_CALLBACK,
    FRIENDS_QUOTE_AWAIT,
    TVMAZE_EPISODE,
];

const CONTAINERS: [&str; 4] = ["first", "second", "third", "fourth"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// SWAPI requests plus the OMDb search form.
    Review,
    /// Inline joke, Friends quotes and a TVmaze episode.
    Exercise,
}

impl Page {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "review" | "axios-review" => Some(Page::Review),
            "exercise" | "ajax-exercise" => Some(Page::Exercise),
            _ => None,
        }
    }

    /// The page as it looks before any script runs.
    pub fn document(&self) -> Document {
        let mut doc = Document::new();
        let body = doc.body();

        if *self == Page::Review {
            let form = doc.create_element("form");
            doc.append(body, form);
            let input = doc.create_element("input");
            doc.set_attribute(input, "type", "text");
            doc.set_attribute(input, "placeholder", "Movie title");
            doc.append(form, input);
            let button = doc.create_element("button");
            doc.set_text(button, "Submit");
            doc.append(form, button);
        }

        for id in CONTAINERS {
            doc.append_with_id(body, "div", id);
        }
        doc
    }

    /// Examples that fire as soon as the page loads.
    pub fn examples(&self) -> &'static [Example] {
        match self {
            Page::Review => REVIEW_EXAMPLES,
            Page::Exercise => EXERCISE_EXAMPLES,
        }
    }

    /// The example driven by the page's form, if it has one.
    pub fn form_example(&self) -> Option<Example> {
        match self {
            Page::Review => Some(OMDB_TITLE),
            Page::Exercise => None,
        }
    }

    /// Starts every load-time example. None of them are awaited here.
    pub fn load(&self, session: &Session) -> Result<Vec<JoinHandle<()>>, PageError> {
        self.examples()
            .iter()
            .map(|example| example.start(session, None))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::notify::RecordingNotifier;
    use serde_json::json;
    use std::rc::Rc;
    use tokio::task::LocalSet;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn texts(session: &Session, selector: &str) -> Vec<String> {
        let doc = session.doc.borrow();
        let node = doc.query_selector(selector).unwrap();
        doc.children(node)
            .iter()
            .map(|c| doc.text(*c).to_string())
            .collect()
    }

    #[test]
    fn test_films_extractor_formats_heading() {
        let body = json!({"results": [
            {"episode_id": 4, "title": "A New Hope", "opening_crawl": "It is a period of civil war."},
        ]});
        let groups = film_crawls(&body);
        assert_eq!(
            groups,
            vec![vec![
                NodeSpec::text("h1", "Episode 4: A New Hope"),
                NodeSpec::text("p", "It is a period of civil war."),
            ]]
        );
    }

    #[test]
    fn test_movie_summary_missing_fields_render_empty() {
        let body = json!({"Response": "False", "Error": "Movie not found!"});
        let groups = movie_summary(&body);
        assert_eq!(groups[0][0], NodeSpec::text("h1", ""));
        assert_eq!(groups[0][2], NodeSpec::src("img", ""));
    }

    #[test]
    fn test_page_names_and_layout() {
        assert_eq!(Page::from_name("Review"), Some(Page::Review));
        assert_eq!(Page::from_name("exercise"), Some(Page::Exercise));
        assert_eq!(Page::from_name("other"), None);

        let doc = Page::Review.document();
        assert!(doc.query_selector("form").is_some());
        assert!(doc.query_selector("input").is_some());
        for id in CONTAINERS {
            assert!(doc.query_selector(&format!("#{id}")).is_some());
        }
        assert!(Page::Exercise.document().query_selector("form").is_none());
    }

    #[tokio::test]
    async fn test_review_page_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/people/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Luke Skywalker"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/starships/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 3,
                "results": [
                    {"name": "CR90 corvette"},
                    {"name": "Star Destroyer"},
                    {"name": "Sentinel-class landing craft"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/films/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"episode_id": 4, "title": "A New Hope", "opening_crawl": "It is a period of civil war."},
                    {"episode_id": 5, "title": "The Empire Strikes Back", "opening_crawl": "It is a dark time for the Rebellion."}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Rc::new(RecordingNotifier::new());
        let session = Session::new(
            Page::Review.document(),
            ApiConfig::all_at(&server.uri()).unwrap(),
            notifier.clone(),
        );

        LocalSet::new()
            .run_until(async {
                for handle in Page::Review.load(&session).unwrap() {
                    handle.await.unwrap();
                }
            })
            .await;

        assert_eq!(texts(&session, "#first"), vec!["Luke Skywalker"]);
        assert_eq!(
            texts(&session, "#second"),
            vec!["CR90 corvette", "Star Destroyer", "Sentinel-class landing craft"]
        );
        assert_eq!(
            texts(&session, "#third"),
            vec![
                "Episode 4: A New Hope",
                "It is a period of civil war.",
                "Episode 5: The Empire Strikes Back",
                "It is a dark time for the Rebellion."
            ]
        );
        assert!(texts(&session, "#fourth").is_empty());
        assert_eq!(notifier.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_exercise_page_load_with_failing_quotes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quotes/random"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/shows/38963/episodebynumber"))
            .and(query_param("season", "2"))
            .and(query_param("number", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Kimmy Kisses a Boy!"})))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Rc::new(RecordingNotifier::new());
        let session = Session::new(
            Page::Exercise.document(),
            ApiConfig::all_at(&server.uri()).unwrap(),
            notifier.clone(),
        );

        LocalSet::new()
            .run_until(async {
                for handle in Page::Exercise.load(&session).unwrap() {
                    handle.await.unwrap();
                }
            })
            .await;

        assert_eq!(
            texts(&session, "#first"),
            vec!["Why did the programmer quit his job?", "Because he didn't get arrays."]
        );
        assert!(texts(&session, "#second").is_empty());
        assert!(texts(&session, "#third").is_empty());
        assert_eq!(texts(&session, "#fourth"), vec!["Kimmy Kisses a Boy!"]);

        // Both quote examples fail, only the callback one alerts.
        assert_eq!(notifier.failure_count(), 2);
        assert_eq!(notifier.alert_count(), 1);
    }
}
