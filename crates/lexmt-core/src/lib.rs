pub mod corpus;
pub mod decoder;
pub mod gazetteer;
pub mod lang;
pub mod lm;
pub mod morph;
pub mod phrase_table;
pub mod settings;
pub mod text;
pub mod token;
