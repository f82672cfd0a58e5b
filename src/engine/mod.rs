//! Text heuristics and the upload pipeline.

pub mod dates;
pub mod extract;
pub mod keywords;
pub mod stopwords;
pub mod tokenizer;
pub mod upload;

pub use dates::DateExtractor;
pub use extract::{ContentReader, SourceFile, TextExtractor, MIME_PLAIN_TEXT, MIME_WORD_DOCUMENT};
pub use keywords::{KeywordGenerator, KeywordRanker, RankedKeyword};
pub use tokenizer::Tokenizer;
pub use upload::{
    ConfirmedUpload, FileOutcome, StagedUpload, UploadFailure, UploadPipeline, UploadReport,
    UploadStaging,
};
