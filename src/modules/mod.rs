pub mod books;

use bookshelf_kernel::ModuleRegistry;

use books::routes::SharedRepository;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, repository: SharedRepository) {
    registry.register_custom(books::create_module(repository));
}
