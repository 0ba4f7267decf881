mod documents;
mod media;
