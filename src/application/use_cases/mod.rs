mod delete_file;
mod download_file;
mod list_files;
mod upload_file;

pub use delete_file::DeleteFileUseCase;
pub use download_file::DownloadFileUseCase;
pub use list_files::ListFilesUseCase;
pub use upload_file::UploadFileUseCase;
