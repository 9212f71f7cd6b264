pub mod redirector;
