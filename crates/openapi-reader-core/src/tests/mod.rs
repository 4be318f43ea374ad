mod paths;
mod support;
