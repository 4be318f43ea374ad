mod drf;
mod imports;
mod support;
