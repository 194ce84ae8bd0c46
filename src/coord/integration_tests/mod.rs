mod helper;

mod restart;
