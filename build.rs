use vergen_gitcl::{Emitter, Gitcl};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only the short sha and dirty flag feed `version_string()`.
    let git = Gitcl::builder().sha(true).dirty(true).build();
    Emitter::default().add_instructions(&git)?.emit()?;
    Ok(())
}
