use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    rag_chat::cli::main()
}
