// Unit tests for corpus loading and HTML article extraction.

use std::io::Cursor;

use topicmap::corpus::html::{extract_directory, ArticleExtractor};
use topicmap::corpus::loader::{load_corpus, read_corpus, ColumnNames};
use topicmap::corpus::{Corpus, Document};
use topicmap::error::PipelineError;
use topicmap::output::tables::write_corpus;

fn read(data: &str) -> Result<Corpus, PipelineError> {
    read_corpus(Cursor::new(data), &ColumnNames::default())
}

// ============================================================
// Corpus CSV
// ============================================================

#[test]
fn loads_rows_in_order_with_extra_columns() {
    let corpus = read("url,id,title,body\nhttp://x,a.html,Pluja,Cau aigua\nhttp://y,b.html,Sol,\n")
        .unwrap();
    assert_eq!(corpus.ids(), vec!["a.html", "b.html"]);
    assert_eq!(corpus.documents()[0].body, "Cau aigua");
    // An empty body is allowed
    assert_eq!(corpus.documents()[1].full_text(), "Sol");
}

#[test]
fn missing_column_rejects_before_reading_rows() {
    match read("id,title\na,Title\n").unwrap_err() {
        PipelineError::InvalidInput { row, field, .. } => {
            assert_eq!(row, 0);
            assert_eq!(field, "body");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn short_row_rejects_whole_run() {
    let err = read("id,title,body\na,One,Body\nb,Two\n").unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput { row: 2, .. }));
}

#[test]
fn empty_id_names_row_and_field() {
    let err = read("id,title,body\na,One,x\n  ,Two,y\n").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("row 2"), "{message}");
    assert!(message.contains("`id`"), "{message}");
}

#[test]
fn header_only_file_is_empty_corpus() {
    assert!(matches!(read("id,title,body\n"), Err(PipelineError::EmptyCorpus)));
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = Corpus::new(vec![
        Document::new("a", "One", "x"),
        Document::new("a", "Two", "y"),
    ])
    .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput { row: 2, .. }));
}

#[test]
fn custom_column_names() {
    let columns = ColumnNames {
        id: "file".to_string(),
        title: "headline".to_string(),
        body: "text".to_string(),
    };
    let corpus = read_corpus(Cursor::new("file,headline,text\nf1,H,T\n"), &columns).unwrap();
    assert_eq!(corpus.documents()[0], Document::new("f1", "H", "T"));
}

#[test]
fn load_corpus_reports_missing_file() {
    let err = load_corpus(
        std::path::Path::new("/nonexistent/topicmap/articles.csv"),
        &ColumnNames::default(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to open corpus file"));
}

#[test]
fn written_corpus_reads_back() {
    let documents = vec![
        Document::new("a.html", "Títol, amb coma", "Primer paràgraf.\n\nSegon \"citat\"."),
        Document::new("b.html", "Altre", ""),
    ];
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.csv");
    write_corpus(std::fs::File::create(&path).unwrap(), &documents).unwrap();

    let corpus = load_corpus(&path, &ColumnNames::default()).unwrap();
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.documents()[0].title, "Títol, amb coma");
    assert_eq!(
        corpus.documents()[0].body,
        "Primer paràgraf.  Segon \"citat\"."
    );
    assert_eq!(corpus.documents()[1].body, "");
}

// ============================================================
// Document text
// ============================================================

#[test]
fn full_text_joins_title_and_body() {
    assert_eq!(Document::new("a", " Títol ", " Cos ").full_text(), "Títol. Cos");
    assert_eq!(Document::new("a", "", "Cos").full_text(), "Cos");
    assert_eq!(Document::new("a", "", "  ").full_text(), "");
}

// ============================================================
// HTML extraction
// ============================================================

const ARTICLE: &str = r#"<html>
<head>
  <title>Fallback title | Diari</title>
  <meta property="og:title" content="Temporal a la costa">
</head>
<body>
  <header><p>Subscriu-te al nostre butlletí per rebre totes les notícies cada dia.</p></header>
  <nav><p>Portada · Política · Societat · Cultura · Esports · Opinió · Economia</p></nav>
  <article class="content-noticia-body">
    <p>Curt.</p>
    <p>La pluja ha obligat a tancar diverses carreteres de la comarca durant la nit.</p>
    <p>Els serveis d'emergència han atès més de dues-centes trucades des de la tarda.</p>
    <aside><p>Publicitat: compra ara el teu abonament anual amb un vint per cent de descompte.</p></aside>
  </article>
  <footer><p>Tots els drets reservats. Aquest lloc web utilitza galetes pròpies i de tercers.</p></footer>
</body>
</html>"#;

#[test]
fn extracts_title_and_container_paragraphs() {
    let extractor = ArticleExtractor::new().unwrap();
    let (title, body) = extractor.extract(ARTICLE);

    assert_eq!(title, "Temporal a la costa");
    assert_eq!(
        body,
        "La pluja ha obligat a tancar diverses carreteres de la comarca durant la nit.\n\n\
         Els serveis d'emergència han atès més de dues-centes trucades des de la tarda."
    );
}

#[test]
fn falls_back_to_long_paragraphs_anywhere() {
    let long = "a".repeat(120);
    let html = format!("<html><body><h1>Titular</h1><div><p>{long}</p><p>breu però no prou llarg</p></div></body></html>");
    let (title, body) = ArticleExtractor::new().unwrap().extract(&html);
    assert_eq!(title, "Titular");
    assert_eq!(body, long);
}

#[test]
fn page_without_title_is_untitled() {
    let (title, body) = ArticleExtractor::new().unwrap().extract("<html><body></body></html>");
    assert_eq!(title, "Untitled");
    assert_eq!(body, "");
}

#[test]
fn extract_directory_uses_filenames_as_ids() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("02-sol.html"), "<title>Sol</title>").unwrap();
    std::fs::write(dir.path().join("01-pluja.html"), ARTICLE).unwrap();

    let documents = extract_directory(dir.path()).unwrap();
    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["01-pluja.html", "02-sol.html"]);
    assert_eq!(documents[0].title, "Temporal a la costa");
    assert_eq!(documents[1].title, "Sol");
}
