mod exercises;
mod flow;
mod frontend;
mod session;
