// Dossier matching: rank candidate CVs against a recruiter's case file.
// Candidates are parsed and scored concurrently; one bad CV never fails the batch.

pub mod handlers;
pub mod models;
pub mod ranking;
