pub mod chunk_file;
