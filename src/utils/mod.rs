pub mod response; // Response builders
