mod instructor;

pub use instructor::Instructor;
