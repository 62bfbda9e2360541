mod check;
mod debug;
mod helpers;
mod mocks;
