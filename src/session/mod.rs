mod index_session;

pub use index_session::IndexSession;
