pub mod change_watcher;
