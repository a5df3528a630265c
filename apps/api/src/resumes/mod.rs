// Résumé builder endpoints: import a CV as a builder document, reorder its
// sections, score it against a posting.

pub mod handlers;
