pub mod pointer_sm;
