use std::path::PathBuf;

use tolk_corpus::{Corpus, CorpusError};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/translated_threads.json")
}

#[test]
fn test_load_fixture() {
    let corpus = Corpus::load(fixture_path()).unwrap();

    assert_eq!(corpus.len(), 2);
    let titles: Vec<String> = corpus.threads().iter().map(|t| t.display_title()).collect();
    assert_eq!(titles[0], "42 - Hur byter jag vinterdäck själv?");
    assert_eq!(titles[1], "43 - Surdegsbröd som inte jäser");
}

#[test]
fn test_lookup_thread_and_post() {
    let corpus = Corpus::load(fixture_path()).unwrap();

    let thread = corpus.thread("42").unwrap();
    assert_eq!(thread.forum_title.as_deref(), Some("Bilar"));
    assert_eq!(thread.sources().len(), 4);

    let reply = corpus.post("42", "9002").unwrap();
    assert_eq!(reply.heading(), "Reply 1");
    assert!(reply.translation("gemini-2.0-flash-exp").is_none());
    assert!(reply.translation("gpt-4o").is_some());

    assert!(corpus.post("42", "nope").is_none());
    assert!(corpus.thread("44").is_none());
}

#[test]
fn test_corpus_token_usage() {
    let corpus = Corpus::load(fixture_path()).unwrap();
    let usage = corpus.token_usage();

    let gpt = usage.get("gpt-4o").unwrap();
    assert_eq!(gpt.translations, 5);
    assert_eq!(gpt.total_tokens, 70 + 84 + 94 + 67 + 77);

    let gemini = usage.get("gemini-2.0-flash-exp").unwrap();
    assert_eq!(gemini.translations, 2);
    assert_eq!(gemini.unreported, 2);
    assert_eq!(gemini.total_tokens, 0);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Corpus::load("does/not/exist.json").unwrap_err();
    assert!(matches!(err, CorpusError::Io { .. }));
}
