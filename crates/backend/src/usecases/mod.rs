pub mod u508_import_translations;
