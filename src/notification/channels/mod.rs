//! 具体渠道实现

pub mod composite;
pub mod console;
pub mod desktop;
pub mod memory;

pub use composite::CompositeNotifier;
pub use console::ConsoleNotifier;
pub use desktop::{desktop_notifier, LinuxNotifier, MacOsNotifier, WindowsNotifier};
pub use memory::MemoryNotifier;
