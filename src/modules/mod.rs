pub mod books;

use bookshelf_kernel::ModuleRegistry;

use books::BookStore;

/// Register every application module with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: BookStore) -> anyhow::Result<()> {
    registry.register(books::create_module(store))?;
    Ok(())
}
